use crate::{
    data_structures::texture::Texture,
    resources::{LoaderContext, extension_of, load_binary},
};

/// Read and decode the image behind `locator`.
///
/// The texture is named after the requested locator, not the remapped file.
pub async fn load_texture(locator: &str, context: &LoaderContext) -> anyhow::Result<Texture> {
    let path = context.path_for(locator);
    let data = load_binary(&path).await?;
    let format = extension_of(context.resolve_url(locator));
    Texture::from_bytes(&data, locator, format.as_deref())
}
