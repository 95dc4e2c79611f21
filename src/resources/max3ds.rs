//! Reader for Autodesk 3DS model files.
//!
//! Only the chunks needed for textured static meshes are read: object names,
//! vertices, faces, texture coordinates, the material assigned to the faces and
//! the diffuse texture file of each material. Everything else is skipped.
//!
//! 3DS files are Z-up; positions are converted to Y-up while reading.

use std::{collections::HashMap, sync::Arc};

use anyhow::{Context, Result, bail, ensure};
use log::warn;

use crate::{
    assets::ResolvedAsset,
    data_structures::{
        model::{MaterialAsset, MeshAsset, MeshData},
        texture::Texture,
    },
    resources::{LoaderContext, load_binary, texture::load_texture},
};

const MAIN: u16 = 0x4D4D;
const EDITOR: u16 = 0x3D3D;
const OBJECT: u16 = 0x4000;
const TRIMESH: u16 = 0x4100;
const VERTICES: u16 = 0x4110;
const FACES: u16 = 0x4120;
const FACE_MATERIAL: u16 = 0x4130;
const TEX_COORDS: u16 = 0x4140;
const MATERIAL: u16 = 0xAFFF;
const MATERIAL_NAME: u16 = 0xA000;
const TEXTURE_MAP: u16 = 0xA200;
const MAP_FILE: u16 = 0xA300;

const HEADER_LEN: usize = 6;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Object3ds {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    pub material: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Material3ds {
    pub name: String,
    /// File name of the diffuse texture map, as stored in the file.
    pub texture: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model3ds {
    pub objects: Vec<Object3ds>,
    pub materials: Vec<Material3ds>,
}

impl Model3ds {
    pub fn material(&self, name: &str) -> Option<&Material3ds> {
        self.materials.iter().find(|material| material.name == name)
    }
}

/// Little endian cursor over the body of one chunk.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        ensure!(
            self.data.len() - self.pos >= len,
            "unexpected end of data at byte {} (needed {} more)",
            self.pos,
            len
        );
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn u16(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.u32()?))
    }

    fn cstring(&mut self) -> Result<String> {
        let rest = &self.data[self.pos..];
        let Some(end) = rest.iter().position(|&b| b == 0) else {
            bail!("unterminated string at byte {}", self.pos);
        };
        let text = String::from_utf8_lossy(&rest[..end]).into_owned();
        self.pos += end + 1;
        Ok(text)
    }

    /// Read the next chunk header and return its id and a reader over its body.
    fn chunk(&mut self) -> Result<(u16, Reader<'a>)> {
        let start = self.pos;
        let id = self.u16()?;
        let len = self.u32()? as usize;
        ensure!(
            len >= HEADER_LEN,
            "chunk {:#06x} at byte {} is shorter than its header",
            id,
            start
        );
        let body = self
            .take(len - HEADER_LEN)
            .with_context(|| format!("chunk {:#06x} at byte {} is truncated", id, start))?;
        Ok((id, Reader::new(body)))
    }
}

/// Parse the contents of a 3DS file.
pub fn parse(bytes: &[u8]) -> Result<Model3ds> {
    let mut reader = Reader::new(bytes);
    let (id, mut main) = reader.chunk()?;
    ensure!(id == MAIN, "not a 3DS file (first chunk is {:#06x})", id);

    let mut model = Model3ds::default();
    while !main.is_empty() {
        let (id, mut chunk) = main.chunk()?;
        if id == EDITOR {
            parse_editor(&mut chunk, &mut model)?;
        }
    }
    Ok(model)
}

fn parse_editor(reader: &mut Reader, model: &mut Model3ds) -> Result<()> {
    while !reader.is_empty() {
        let (id, mut chunk) = reader.chunk()?;
        match id {
            OBJECT => {
                let name = chunk.cstring()?;
                while !chunk.is_empty() {
                    let (id, mut sub) = chunk.chunk()?;
                    // lights and cameras are objects too, only meshes are kept
                    if id == TRIMESH {
                        model.objects.push(parse_trimesh(&mut sub, &name)?);
                    }
                }
            }
            MATERIAL => model.materials.push(parse_material(&mut chunk)?),
            _ => {}
        }
    }
    Ok(())
}

fn parse_trimesh(reader: &mut Reader, name: &str) -> Result<Object3ds> {
    let mut object = Object3ds {
        name: name.to_string(),
        ..Default::default()
    };
    while !reader.is_empty() {
        let (id, mut chunk) = reader.chunk()?;
        match id {
            VERTICES => {
                let count = chunk.u16()?;
                for _ in 0..count {
                    let (x, y, z) = (chunk.f32()?, chunk.f32()?, chunk.f32()?);
                    object.positions.push([x, z, y]);
                }
            }
            FACES => {
                let count = chunk.u16()?;
                for _ in 0..count {
                    let (a, b, c) = (chunk.u16()?, chunk.u16()?, chunk.u16()?);
                    let _flags = chunk.u16()?;
                    // swapping y and z mirrors the mesh, so the winding flips too
                    object.indices.extend([a as u32, c as u32, b as u32]);
                }
                while !chunk.is_empty() {
                    let (id, mut sub) = chunk.chunk()?;
                    if id == FACE_MATERIAL && object.material.is_none() {
                        object.material = Some(sub.cstring()?);
                    }
                }
            }
            TEX_COORDS => {
                let count = chunk.u16()?;
                for _ in 0..count {
                    let (u, v) = (chunk.f32()?, chunk.f32()?);
                    object.tex_coords.push([u, 1.0 - v]);
                }
            }
            _ => {}
        }
    }

    let vertex_count = object.positions.len() as u32;
    if let Some(index) = object.indices.iter().find(|&&index| index >= vertex_count) {
        bail!(
            "object '{}' references vertex {} but has only {}",
            object.name,
            index,
            vertex_count
        );
    }
    Ok(object)
}

fn parse_material(reader: &mut Reader) -> Result<Material3ds> {
    let mut material = Material3ds::default();
    while !reader.is_empty() {
        let (id, mut chunk) = reader.chunk()?;
        match id {
            MATERIAL_NAME => material.name = chunk.cstring()?,
            TEXTURE_MAP => {
                while !chunk.is_empty() {
                    let (id, mut sub) = chunk.chunk()?;
                    if id == MAP_FILE {
                        material.texture = Some(sub.cstring()?);
                    }
                }
            }
            _ => {}
        }
    }
    Ok(material)
}

/// Load a 3DS file and the textures its materials reference.
///
/// Texture references go through the url map of `context`. A texture that
/// cannot be loaded leaves the material untextured instead of failing the model.
/// Every mesh of the file is tagged with `locator`.
pub async fn load_model(locator: &str, context: &LoaderContext) -> Result<Vec<ResolvedAsset>> {
    let data = load_binary(&context.path_for(locator)).await?;
    let Model3ds { objects, materials } =
        parse(&data).with_context(|| format!("could not parse '{}'", locator))?;

    let mut textures: HashMap<String, Option<Arc<Texture>>> = HashMap::new();
    for file in materials.iter().filter_map(|material| material.texture.as_ref()) {
        if textures.contains_key(file) {
            continue;
        }
        let texture = match load_texture(file, context).await {
            Ok(texture) => Some(Arc::new(texture)),
            Err(e) => {
                warn!("Texture '{}' of '{}' could not be loaded: {:#}", file, locator, e);
                None
            }
        };
        textures.insert(file.clone(), texture);
    }

    let assets = objects
        .into_iter()
        .map(|object| {
            let material = object
                .material
                .as_deref()
                .and_then(|name| materials.iter().find(|material| material.name == name))
                .map(|material| MaterialAsset {
                    name: material.name.clone(),
                    texture: material
                        .texture
                        .as_ref()
                        .and_then(|file| textures.get(file).cloned().flatten()),
                });
            ResolvedAsset::mesh(
                locator,
                MeshAsset {
                    name: object.name,
                    data: Arc::new(MeshData {
                        positions: object.positions,
                        tex_coords: object.tex_coords,
                        indices: object.indices,
                    }),
                    material,
                },
            )
        })
        .collect();
    Ok(assets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: u16, body: &[u8]) -> Vec<u8> {
        let mut bytes = id.to_le_bytes().to_vec();
        bytes.extend(((body.len() + HEADER_LEN) as u32).to_le_bytes());
        bytes.extend_from_slice(body);
        bytes
    }

    fn cstr(text: &str) -> Vec<u8> {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        bytes
    }

    fn triangle_file() -> Vec<u8> {
        let mut vertices = 3u16.to_le_bytes().to_vec();
        for v in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 2.0]] {
            for c in v {
                vertices.extend(c.to_le_bytes());
            }
        }
        let mut faces = 1u16.to_le_bytes().to_vec();
        for i in [0u16, 1, 2, 0] {
            faces.extend(i.to_le_bytes());
        }
        let mut face_material = cstr("ant_skin");
        face_material.extend(1u16.to_le_bytes());
        face_material.extend(0u16.to_le_bytes());
        faces.extend(chunk(FACE_MATERIAL, &face_material));
        let mut uvs = 3u16.to_le_bytes().to_vec();
        for uv in [[0.0f32, 0.0], [1.0, 0.0], [0.0, 1.0]] {
            for c in uv {
                uvs.extend(c.to_le_bytes());
            }
        }
        let mut trimesh = chunk(VERTICES, &vertices);
        trimesh.extend(chunk(FACES, &faces));
        trimesh.extend(chunk(TEX_COORDS, &uvs));

        let mut object = cstr("body");
        object.extend(chunk(TRIMESH, &trimesh));

        let mut material = chunk(MATERIAL_NAME, &cstr("ant_skin"));
        material.extend(chunk(TEXTURE_MAP, &chunk(MAP_FILE, &cstr("TEXTURE.JPG"))));

        let mut editor = chunk(OBJECT, &object);
        editor.extend(chunk(MATERIAL, &material));
        // an unknown chunk that has to be skipped
        editor.extend(chunk(0x0100, &1.0f32.to_le_bytes()));
        chunk(MAIN, &chunk(EDITOR, &editor))
    }

    #[test]
    fn parses_a_textured_triangle() {
        let model = parse(&triangle_file()).unwrap();
        assert_eq!(model.objects.len(), 1);
        let object = &model.objects[0];
        assert_eq!(object.name, "body");
        assert_eq!(object.positions[2], [0.0, 2.0, 1.0]);
        assert_eq!(object.indices, vec![0, 2, 1]);
        assert_eq!(object.tex_coords[0], [0.0, 1.0]);
        assert_eq!(object.material.as_deref(), Some("ant_skin"));
        assert_eq!(
            model.material("ant_skin").and_then(|m| m.texture.as_deref()),
            Some("TEXTURE.JPG")
        );
    }

    #[test]
    fn rejects_other_files() {
        assert!(parse(&chunk(0x1234, &[])).is_err());
        assert!(parse(b"\x89PNG").is_err());
    }

    #[test]
    fn rejects_truncated_chunks() {
        let mut bytes = triangle_file();
        bytes.truncate(bytes.len() - 10);
        assert!(parse(&bytes).is_err());
    }

    #[test]
    fn rejects_out_of_range_faces() {
        let mut faces = 1u16.to_le_bytes().to_vec();
        for i in [0u16, 1, 7, 0] {
            faces.extend(i.to_le_bytes());
        }
        let mut object = cstr("broken");
        object.extend(chunk(TRIMESH, &chunk(FACES, &faces)));
        let bytes = chunk(MAIN, &chunk(EDITOR, &chunk(OBJECT, &object)));
        assert!(parse(&bytes).is_err());
    }
}
