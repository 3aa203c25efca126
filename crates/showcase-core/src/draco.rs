//! `KHR_draco_mesh_compression` primitives.
//!
//! The decoder hands back one flat little-endian buffer: the triangle indices
//! first (`u16` when they fit, `u32` otherwise), then every attribute in
//! ascending Draco attribute id, `vertex_count` elements each. `DracoLayout`
//! describes that buffer so positions can be read back without the decoder.

use crate::asset::MeshData;
use crate::error::AssetLoadError;
use glam::Vec3;
use gltf::accessor::DataType;
use gltf::mesh::Semantic;

pub const DRACO_EXTENSION: &str = "KHR_draco_mesh_compression";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DracoAttribute {
    pub draco_id: u32,
    pub is_position: bool,
    pub components: usize,
    pub data_type: DataType,
}

impl DracoAttribute {
    fn byte_len(&self, vertex_count: u32) -> usize {
        self.components * self.data_type.size() * vertex_count as usize
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DracoLayout {
    pub vertex_count: u32,
    pub index_count: u32,
    /// Sorted by `draco_id`.
    pub attributes: Vec<DracoAttribute>,
}

fn invalid(msg: impl Into<String>) -> AssetLoadError {
    AssetLoadError::Decode(format!("draco: {}", msg.into()))
}

#[inline]
fn f32_at(c: &[u8], i: usize) -> f32 {
    f32::from_le_bytes([c[i], c[i + 1], c[i + 2], c[i + 3]])
}

impl DracoLayout {
    fn index_width(&self) -> usize {
        if self.index_count <= u16::MAX as u32 {
            2
        } else {
            4
        }
    }

    /// Pull positions and triangle indices out of a decoded buffer.
    pub fn read_mesh(&self, decoded: &[u8]) -> Result<MeshData, AssetLoadError> {
        let width = self.index_width();
        let index_bytes = self.index_count as usize * width;
        let raw = decoded
            .get(..index_bytes)
            .ok_or_else(|| invalid("decoded buffer is shorter than its indices"))?;
        let indices: Vec<u32> = if self.index_count == 0 {
            (0..self.vertex_count).collect()
        } else if width == 2 {
            raw.chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]) as u32)
                .collect()
        } else {
            raw.chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect()
        };

        let mut offset = index_bytes;
        let mut positions = None;
        for attr in &self.attributes {
            let len = attr.byte_len(self.vertex_count);
            let bytes = decoded.get(offset..offset + len).ok_or_else(|| {
                invalid(format!("attribute {} runs past the buffer", attr.draco_id))
            })?;
            offset += len;
            if !attr.is_position {
                continue;
            }
            if attr.data_type != DataType::F32 || attr.components != 3 {
                return Err(invalid("POSITION must be a float VEC3"));
            }
            positions = Some(
                bytes
                    .chunks_exact(12)
                    .map(|c| Vec3::new(f32_at(c, 0), f32_at(c, 4), f32_at(c, 8)))
                    .collect::<Vec<_>>(),
            );
        }
        let positions =
            positions.ok_or_else(|| invalid("POSITION is not among the compressed attributes"))?;
        Ok(MeshData::new(positions, indices))
    }
}

/// A compressed primitive: its Draco bitstream and the layout the decoder will produce.
#[derive(Debug)]
pub struct DracoPrimitive<'a> {
    pub compressed: &'a [u8],
    pub layout: DracoLayout,
}

impl<'a> DracoPrimitive<'a> {
    /// Read the primitive's Draco extension block. `Ok(None)` when the
    /// primitive is stored uncompressed.
    pub fn from_primitive(
        prim: &gltf::mesh::Primitive<'_>,
        document: &gltf::Document,
        buffers: &'a [gltf::buffer::Data],
    ) -> Result<Option<Self>, AssetLoadError> {
        let Some(ext) = prim.extension_value(DRACO_EXTENSION) else {
            return Ok(None);
        };
        let view_index = ext
            .get("bufferView")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| invalid("bufferView missing"))? as usize;
        let attr_map = ext
            .get("attributes")
            .and_then(|v| v.as_object())
            .ok_or_else(|| invalid("attributes missing"))?;

        let view = document
            .views()
            .nth(view_index)
            .ok_or_else(|| invalid(format!("bufferView {} out of range", view_index)))?;
        let data = buffers
            .get(view.buffer().index())
            .ok_or_else(|| invalid("bufferView points at a missing buffer"))?;
        let compressed = data
            .0
            .get(view.offset()..view.offset() + view.length())
            .ok_or_else(|| invalid("bufferView runs past its buffer"))?;

        let mut attributes = Vec::with_capacity(attr_map.len());
        for (name, id) in attr_map {
            let draco_id = id
                .as_u64()
                .ok_or_else(|| invalid(format!("attribute {} has no id", name)))?
                as u32;
            let (semantic, accessor) = prim
                .attributes()
                .find(|(s, _)| s.to_string() == *name)
                .ok_or_else(|| invalid(format!("no accessor for {}", name)))?;
            attributes.push(DracoAttribute {
                draco_id,
                is_position: matches!(semantic, Semantic::Positions),
                components: accessor.dimensions().multiplicity(),
                data_type: accessor.data_type(),
            });
        }
        attributes.sort_by_key(|a| a.draco_id);

        let vertex_count = prim
            .get(&Semantic::Positions)
            .ok_or_else(|| invalid("POSITION accessor missing"))?
            .count() as u32;
        let index_count = prim.indices().map_or(0, |a| a.count() as u32);

        Ok(Some(Self {
            compressed,
            layout: DracoLayout {
                vertex_count,
                index_count,
                attributes,
            },
        }))
    }

    pub async fn decode(&self) -> Result<MeshData, AssetLoadError> {
        let decoded = run_decoder(self.compressed, &self.layout).await?;
        self.layout.read_mesh(&decoded)
    }
}

#[cfg(feature = "draco")]
async fn run_decoder(compressed: &[u8], layout: &DracoLayout) -> Result<Vec<u8>, AssetLoadError> {
    use draco_decoder::{decode_mesh, AttributeDataType, MeshDecodeConfig};

    let mut cfg = MeshDecodeConfig::new(layout.vertex_count, layout.index_count);
    for attr in &layout.attributes {
        let ty = match attr.data_type {
            DataType::I8 => AttributeDataType::Int8,
            DataType::U8 => AttributeDataType::UInt8,
            DataType::I16 => AttributeDataType::Int16,
            DataType::U16 => AttributeDataType::UInt16,
            DataType::U32 => AttributeDataType::UInt32,
            DataType::F32 => AttributeDataType::Float32,
        };
        cfg.add_attribute(attr.components as u32, ty);
    }
    decode_mesh(compressed, &cfg)
        .await
        .ok_or_else(|| invalid("decoder rejected the bitstream"))
}

// Builds without the decoder report compressed primitives instead of failing to parse them.
#[cfg(not(feature = "draco"))]
async fn run_decoder(
    _compressed: &[u8],
    _layout: &DracoLayout,
) -> Result<Vec<u8>, AssetLoadError> {
    Err(AssetLoadError::UnsupportedCompression(DRACO_EXTENSION.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(id: u32) -> DracoAttribute {
        DracoAttribute {
            draco_id: id,
            is_position: true,
            components: 3,
            data_type: DataType::F32,
        }
    }

    fn normal(id: u32) -> DracoAttribute {
        DracoAttribute {
            is_position: false,
            ..position(id)
        }
    }

    fn push_f32s(out: &mut Vec<u8>, values: &[f32]) {
        for v in values {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }

    #[test]
    fn positions_are_found_after_indices_and_earlier_attributes() {
        let layout = DracoLayout {
            vertex_count: 3,
            index_count: 3,
            attributes: vec![normal(0), position(1)],
        };
        let mut decoded = Vec::new();
        for i in [2u16, 1, 0] {
            decoded.extend_from_slice(&i.to_le_bytes());
        }
        push_f32s(&mut decoded, &[0.0, 0.0, 1.0].repeat(3));
        push_f32s(&mut decoded, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);

        let mesh = layout.read_mesh(&decoded).unwrap();
        assert_eq!(mesh.indices, vec![2, 1, 0]);
        assert_eq!(mesh.positions, vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
    }

    #[test]
    fn wide_index_counts_use_u32_indices() {
        let layout = DracoLayout {
            vertex_count: 0,
            index_count: 70_000,
            attributes: vec![position(0)],
        };
        let mut decoded = Vec::new();
        for i in 0..70_000u32 {
            decoded.extend_from_slice(&(i % 3).to_le_bytes());
        }
        let mesh = layout.read_mesh(&decoded).unwrap();
        assert_eq!(mesh.indices.len(), 70_000);
        assert_eq!(mesh.indices[4], 1);
    }

    #[test]
    fn missing_indices_become_a_triangle_list() {
        let layout = DracoLayout {
            vertex_count: 3,
            index_count: 0,
            attributes: vec![position(0)],
        };
        let mut decoded = Vec::new();
        push_f32s(&mut decoded, &[0.0; 9]);
        assert_eq!(layout.read_mesh(&decoded).unwrap().indices, vec![0, 1, 2]);
    }

    #[test]
    fn truncated_or_positionless_output_is_a_decode_error() {
        let layout = DracoLayout {
            vertex_count: 3,
            index_count: 3,
            attributes: vec![position(0)],
        };
        let short = vec![0u8; 6 + 12];
        assert!(matches!(
            layout.read_mesh(&short),
            Err(AssetLoadError::Decode(_))
        ));

        let no_position = DracoLayout {
            attributes: vec![normal(0)],
            ..layout
        };
        let mut decoded = vec![0u8; 6];
        push_f32s(&mut decoded, &[0.0; 9]);
        assert!(matches!(
            no_position.read_mesh(&decoded),
            Err(AssetLoadError::Decode(_))
        ));
    }
}
