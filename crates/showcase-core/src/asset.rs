//! glTF / GLB decoding into the small scene description the sampler needs.

use crate::draco::{DracoPrimitive, DRACO_EXTENSION};
use crate::error::{AssetLoadError, InvalidSceneGraphError};
use glam::Vec3;
use gltf::mesh::Mode;

const MESHOPT_EXTENSION: &str = "EXT_meshopt_compression";

/// Triangle geometry in the node's local space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Append `other`, rebasing its indices past the vertices already held.
    pub fn append(&mut self, other: MeshData) {
        let base = self.positions.len() as u32;
        self.positions.extend(other.positions);
        self.indices.extend(other.indices.into_iter().map(|i| base + i));
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles, skipping any that reference missing vertices.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            let a = *self.positions.get(tri[0] as usize)?;
            let b = *self.positions.get(tri[1] as usize)?;
            let c = *self.positions.get(tri[2] as usize)?;
            Some([a, b, c])
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoadedNode {
    pub name: String,
    pub mesh: Option<MeshData>,
}

/// Top-level nodes of the asset's default scene, in document order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadedScene {
    pub scene_found: bool,
    pub nodes: Vec<LoadedNode>,
}

impl LoadedScene {
    /// Scene with a single top-level mesh node; handy for tests and procedural assets.
    pub fn from_mesh(name: &str, mesh: MeshData) -> Self {
        Self {
            scene_found: true,
            nodes: vec![LoadedNode {
                name: name.to_string(),
                mesh: Some(mesh),
            }],
        }
    }

    /// The mesh of the first top-level node; the particle cloud is derived from it.
    pub fn primary_mesh(&self) -> Result<&MeshData, InvalidSceneGraphError> {
        if !self.scene_found {
            return Err(InvalidSceneGraphError::NoScene);
        }
        let node = self
            .nodes
            .first()
            .ok_or(InvalidSceneGraphError::NoTopLevelNode)?;
        let mesh = node
            .mesh
            .as_ref()
            .ok_or_else(|| InvalidSceneGraphError::NodeHasNoMesh(node.name.clone()))?;
        if mesh.triangle_count() == 0 {
            return Err(InvalidSceneGraphError::EmptyGeometry);
        }
        Ok(mesh)
    }
}

fn decode_err(e: gltf::Error) -> AssetLoadError {
    AssetLoadError::Decode(e.to_string())
}

// The gltf crate refuses any required extension it does not implement.
// Draco is decoded here, so it is taken off the required list before validation.
fn parse_document(bytes: &[u8]) -> Result<gltf::Gltf, AssetLoadError> {
    let gltf::Gltf { document, blob } =
        gltf::Gltf::from_slice_without_validation(bytes).map_err(decode_err)?;
    if let Some(ext) = document
        .extensions_required()
        .find(|e| *e == MESHOPT_EXTENSION)
    {
        return Err(AssetLoadError::UnsupportedCompression(ext.to_string()));
    }
    let mut root = document.into_json();
    root.extensions_required.retain(|e| e != DRACO_EXTENSION);
    let document = gltf::Document::from_json(root).map_err(decode_err)?;
    Ok(gltf::Gltf { document, blob })
}

/// Decode a `.glb` (or self-contained `.gltf`) byte buffer. Draco-compressed
/// primitives go through the Draco decoder, which is asynchronous in the browser.
pub async fn decode_gltf(bytes: &[u8]) -> Result<LoadedScene, AssetLoadError> {
    let gltf::Gltf { document, blob } = parse_document(bytes)?;
    let buffers = gltf::import_buffers(&document, None, blob).map_err(decode_err)?;

    let Some(scene) = document.default_scene().or_else(|| document.scenes().next()) else {
        return Ok(LoadedScene::default());
    };

    let mut nodes = Vec::new();
    for node in scene.nodes() {
        let mesh = match node.mesh() {
            Some(m) => Some(read_mesh(&document, &m, &buffers).await?),
            None => None,
        };
        nodes.push(LoadedNode {
            name: node.name().unwrap_or_default().to_string(),
            mesh,
        });
    }

    Ok(LoadedScene {
        scene_found: true,
        nodes,
    })
}

// Merge every triangle-list primitive of a mesh into one index space.
async fn read_mesh(
    document: &gltf::Document,
    mesh: &gltf::Mesh<'_>,
    buffers: &[gltf::buffer::Data],
) -> Result<MeshData, AssetLoadError> {
    let mut out = MeshData::default();
    for prim in mesh.primitives() {
        if prim.mode() != Mode::Triangles {
            log::warn!("[load] skipping non-triangle primitive ({:?})", prim.mode());
            continue;
        }
        if let Some(draco) = DracoPrimitive::from_primitive(&prim, document, buffers)? {
            out.append(draco.decode().await?);
            continue;
        }
        let reader = prim.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
        let Some(positions) = reader.read_positions() else {
            continue;
        };
        let base = out.positions.len() as u32;
        out.positions.extend(positions.map(Vec3::from_array));
        let count = out.positions.len() as u32 - base;
        match reader.read_indices() {
            Some(indices) => out
                .indices
                .extend(indices.into_u32().map(|i| base + i)),
            None => out.indices.extend(base..base + count),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draco::DracoAttribute;
    use gltf::accessor::DataType;
    use pollster::block_on;

    const QUAD: [[f32; 3]; 4] = [
        [-0.5, -0.5, 0.0],
        [0.5, -0.5, 0.0],
        [0.5, 0.5, 0.0],
        [-0.5, 0.5, 0.0],
    ];
    const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];
    const POSITION_ACCESSOR: &str =
        r#""componentType":5126,"count":4,"type":"VEC3","min":[-0.5,-0.5,0.0],"max":[0.5,0.5,0.0]"#;

    /// Wrap a JSON document and a binary chunk into a GLB container.
    fn glb(json: &str, bin: &[u8]) -> Vec<u8> {
        let mut json = json.as_bytes().to_vec();
        while json.len() % 4 != 0 {
            json.push(b' ');
        }
        let mut bin = bin.to_vec();
        while bin.len() % 4 != 0 {
            bin.push(0);
        }
        let total = 12 + 8 + json.len() + 8 + bin.len();
        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(b"glTF");
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&(json.len() as u32).to_le_bytes());
        out.extend_from_slice(b"JSON");
        out.extend_from_slice(&json);
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(b"BIN\0");
        out.extend_from_slice(&bin);
        out
    }

    fn quad_bin() -> Vec<u8> {
        let mut bin = Vec::new();
        for p in QUAD {
            for c in p {
                bin.extend_from_slice(&c.to_le_bytes());
            }
        }
        for i in QUAD_INDICES {
            bin.extend_from_slice(&i.to_le_bytes());
        }
        bin
    }

    /// Uncompressed quad in the XY plane, optionally declaring required extensions.
    fn quad_glb_requiring(with_mesh: bool, required: &[&str]) -> Vec<u8> {
        let node = if with_mesh {
            r#"{"name":"Quad","mesh":0}"#
        } else {
            r#"{"name":"Empty"}"#
        };
        let required = required
            .iter()
            .map(|e| format!("\"{}\"", e))
            .collect::<Vec<_>>()
            .join(",");
        let json = format!(
            concat!(
                r#"{{"asset":{{"version":"2.0"}},"#,
                r#""extensionsUsed":[{required}],"extensionsRequired":[{required}],"#,
                r#""scene":0,"scenes":[{{"nodes":[0]}}],"nodes":[{node}],"#,
                r#""meshes":[{{"primitives":[{{"attributes":{{"POSITION":0}},"indices":1}}]}}],"#,
                r#""accessors":[{{"bufferView":0,{position}}},"#,
                r#"{{"bufferView":1,"componentType":5125,"count":6,"type":"SCALAR"}}],"#,
                r#""bufferViews":[{{"buffer":0,"byteOffset":0,"byteLength":48}},"#,
                r#"{{"buffer":0,"byteOffset":48,"byteLength":24}}],"#,
                r#""buffers":[{{"byteLength":72}}]}}"#
            ),
            required = required,
            node = node,
            position = POSITION_ACCESSOR,
        );
        glb(&json, &quad_bin())
    }

    fn quad_glb(with_mesh: bool) -> Vec<u8> {
        quad_glb_requiring(with_mesh, &[])
    }

    /// The quad as a Draco bitstream: sequential connectivity with raw `u8`
    /// indices and one uncompressed float POSITION attribute.
    fn draco_quad_bitstream() -> Vec<u8> {
        let mut out = b"DRACO".to_vec();
        // version 2.2, triangular mesh, sequential encoding, no flags
        out.extend_from_slice(&[2, 2, 1, 0, 0, 0]);
        // 2 faces, 4 points, uncompressed indices
        out.extend_from_slice(&[2, 4, 1]);
        for i in QUAD_INDICES {
            out.push(i as u8);
        }
        // one attribute decoder holding one attribute:
        // POSITION, FLOAT32, 3 components, not normalized, unique id 0
        out.extend_from_slice(&[1, 1, 0, 9, 3, 0, 0]);
        // generic sequential decoder, then the raw values
        out.push(0);
        for p in QUAD {
            for c in p {
                out.extend_from_slice(&c.to_le_bytes());
            }
        }
        out
    }

    fn draco_quad_glb() -> Vec<u8> {
        let bitstream = draco_quad_bitstream();
        let json = format!(
            concat!(
                r#"{{"asset":{{"version":"2.0"}},"#,
                r#""extensionsUsed":["{ext}"],"extensionsRequired":["{ext}"],"#,
                r#""scene":0,"scenes":[{{"nodes":[0]}}],"nodes":[{{"name":"Quad","mesh":0}}],"#,
                r#""meshes":[{{"primitives":[{{"attributes":{{"POSITION":0}},"indices":1,"#,
                r#""extensions":{{"{ext}":{{"bufferView":0,"attributes":{{"POSITION":0}}}}}}}}]}}],"#,
                r#""accessors":[{{{position}}},"#,
                r#"{{"componentType":5123,"count":6,"type":"SCALAR"}}],"#,
                r#""bufferViews":[{{"buffer":0,"byteOffset":0,"byteLength":{len}}}],"#,
                r#""buffers":[{{"byteLength":{len}}}]}}"#
            ),
            ext = DRACO_EXTENSION,
            position = POSITION_ACCESSOR,
            len = bitstream.len(),
        );
        glb(&json, &bitstream)
    }

    #[test]
    fn decodes_glb_quad() {
        let scene = block_on(decode_gltf(&quad_glb(true))).expect("decode quad");
        let mesh = scene.primary_mesh().expect("primary mesh");
        assert_eq!(mesh.positions.len(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(scene.nodes[0].name, "Quad");
    }

    #[test]
    fn node_without_mesh_is_an_invalid_scene_graph() {
        let scene = block_on(decode_gltf(&quad_glb(false))).expect("decode");
        assert_eq!(
            scene.primary_mesh(),
            Err(InvalidSceneGraphError::NodeHasNoMesh("Empty".into()))
        );
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = block_on(decode_gltf(b"definitely not a model")).unwrap_err();
        assert!(matches!(err, AssetLoadError::Decode(_)));
    }

    #[test]
    fn draco_requirement_passes_validation() {
        let scene = block_on(decode_gltf(&quad_glb_requiring(true, &[DRACO_EXTENSION])))
            .expect("uncompressed primitives still decode");
        assert_eq!(scene.primary_mesh().unwrap().triangle_count(), 2);
    }

    #[test]
    fn draco_primitive_layout_is_read_from_the_extension() {
        let bytes = draco_quad_glb();
        let gltf::Gltf { document, blob } = parse_document(&bytes).expect("parse");
        let buffers = gltf::import_buffers(&document, None, blob).expect("buffers");
        let mesh = document.meshes().next().unwrap();
        let prim = mesh.primitives().next().unwrap();
        let draco = DracoPrimitive::from_primitive(&prim, &document, &buffers)
            .unwrap()
            .expect("compressed primitive");
        assert_eq!(draco.compressed, draco_quad_bitstream().as_slice());
        assert_eq!(draco.layout.vertex_count, 4);
        assert_eq!(draco.layout.index_count, 6);
        assert_eq!(
            draco.layout.attributes,
            vec![DracoAttribute {
                draco_id: 0,
                is_position: true,
                components: 3,
                data_type: DataType::F32,
            }]
        );
    }

    #[cfg(feature = "draco")]
    #[test]
    fn draco_glb_decodes_to_the_quad() {
        let scene = block_on(decode_gltf(&draco_quad_glb())).expect("decode draco quad");
        let mesh = scene.primary_mesh().expect("primary mesh");
        assert_eq!(mesh.indices, QUAD_INDICES.to_vec());
        let expected: Vec<Vec3> = QUAD.iter().map(|p| Vec3::from_array(*p)).collect();
        assert_eq!(mesh.positions, expected);
    }

    #[cfg(not(feature = "draco"))]
    #[test]
    fn draco_glb_without_decoder_reports_unsupported_compression() {
        let err = block_on(decode_gltf(&draco_quad_glb())).unwrap_err();
        assert_eq!(
            err,
            AssetLoadError::UnsupportedCompression(DRACO_EXTENSION.into())
        );
    }

    #[test]
    fn other_required_extensions_are_rejected() {
        let meshopt = block_on(decode_gltf(&quad_glb_requiring(true, &[MESHOPT_EXTENSION])));
        assert_eq!(
            meshopt.unwrap_err(),
            AssetLoadError::UnsupportedCompression(MESHOPT_EXTENSION.into())
        );
        let unknown = block_on(decode_gltf(&quad_glb_requiring(true, &["EXT_made_up"])));
        assert!(matches!(unknown, Err(AssetLoadError::Decode(_))));
    }

    #[test]
    fn append_rebases_indices() {
        let mut mesh = MeshData::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2]);
        mesh.append(MeshData::new(vec![Vec3::Z, Vec3::ONE, Vec3::NEG_X], vec![2, 1, 0]));
        assert_eq!(mesh.positions.len(), 6);
        assert_eq!(mesh.indices, vec![0, 1, 2, 5, 4, 3]);
    }

    #[test]
    fn empty_scene_graph_is_reported() {
        assert_eq!(
            LoadedScene::default().primary_mesh(),
            Err(InvalidSceneGraphError::NoScene)
        );
        let no_nodes = LoadedScene {
            scene_found: true,
            nodes: vec![],
        };
        assert_eq!(
            no_nodes.primary_mesh(),
            Err(InvalidSceneGraphError::NoTopLevelNode)
        );
        let no_tris = LoadedScene::from_mesh("x", MeshData::new(vec![Vec3::ZERO], vec![]));
        assert_eq!(
            no_tris.primary_mesh(),
            Err(InvalidSceneGraphError::EmptyGeometry)
        );
    }
}
