use std::path::{Path, PathBuf};

use anyhow::{Context as _, anyhow, bail};
use cgmath::Point3;
use log::{info, warn};

use crate::data_structures::{
    instance::Instance,
    mesh::{Material, Mesh},
    scene_graph::{NodeId, SceneGraph, SceneGraphNode},
};

/**
 * This module contains all logic for loading models from external files.
 */
pub mod loader;

/// Where relative buffer URIs of a glTF document are resolved.
#[derive(Clone, Debug)]
pub enum UriBase {
    /// The application's assets directory (or the `assets/` path of the page origin on the web).
    Assets,
    Directory(PathBuf),
}

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().ok_or_else(|| anyhow!("no window"))?;
    let location = window.location();
    let origin = location
        .origin()
        .map_err(|_| anyhow!("page origin is not readable"))?;
    let base = reqwest::Url::parse(&format!("{}/assets/", origin))?;
    Ok(base.join(file_name)?)
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name)?;
        reqwest::get(url).await?.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new("./").join("assets").join(file_name);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?
    };
    info!("Fetched {} ({} bytes)", file_name, data.len());

    Ok(data)
}

pub async fn load_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    bail!("cannot read local path {} in the browser", path.display());
    #[cfg(not(target_arch = "wasm32"))]
    {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        info!("Fetched {} ({} bytes)", path.display(), data.len());
        Ok(data)
    }
}

async fn load_uri(base: &UriBase, uri: &str) -> anyhow::Result<Vec<u8>> {
    if uri.starts_with("data:") {
        bail!("embedded data URIs are not supported, export the model as .glb");
    }
    match base {
        UriBase::Assets => load_binary(uri).await,
        UriBase::Directory(dir) => load_file(&dir.join(uri)).await,
    }
}

/**
 * Decodes a glTF (JSON) or GLB (binary) document into a scene graph.
 *
 * Keeps node names, local transforms, triangle geometry and the base colour of
 * each mesh's first material. The graph root is a container named after the
 * scene and holds the scene's top level nodes.
 */
pub async fn decode_gltf(data: &[u8], name: &str, base: &UriBase) -> anyhow::Result<SceneGraph> {
    let gltf = gltf::Gltf::from_slice(data).with_context(|| format!("parsing {}", name))?;

    // Load buffers
    let sources: Vec<Option<String>> = gltf
        .buffers()
        .map(|buffer| match buffer.source() {
            gltf::buffer::Source::Bin => None,
            gltf::buffer::Source::Uri(uri) => Some(uri.to_string()),
        })
        .collect();
    let mut buffer_data = Vec::with_capacity(sources.len());
    for source in sources {
        match source {
            None => {
                let blob = gltf
                    .blob
                    .as_deref()
                    .ok_or_else(|| anyhow!("{} references a missing binary chunk", name))?;
                buffer_data.push(blob.to_vec());
            }
            Some(uri) => buffer_data.push(load_uri(base, &uri).await?),
        }
    }

    // Load materials
    let materials: Vec<Material> = gltf
        .materials()
        .map(|material| Material {
            name: material.name().unwrap_or("unnamed_material").to_string(),
            color: material.pbr_metallic_roughness().base_color_factor().into(),
        })
        .collect();

    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .ok_or_else(|| anyhow!("{} contains no scene", name))?;
    let roots: Vec<gltf::Node> = scene.nodes().collect();

    if roots.is_empty() {
        bail!("scene of {} has no nodes", name);
    }
    let mut graph = SceneGraph::new(SceneGraphNode::new(scene.name().unwrap_or(name)));
    let root = graph.root();
    let mut stack: Vec<(gltf::Node, NodeId)> = roots.into_iter().map(|node| (node, root)).collect();
    // Explicit stack so deeply nested documents cannot exhaust the call stack
    stack.reverse();
    while let Some((node, parent)) = stack.pop() {
        let scene_node = to_scene_node(&node, &buffer_data, &materials);
        let Some(id) = graph.add_child(parent, scene_node) else {
            continue;
        };
        let mut children: Vec<_> = node.children().map(|child| (child, id)).collect();
        children.reverse();
        stack.extend(children);
    }

    Ok(graph)
}

fn to_scene_node(node: &gltf::Node, buffers: &[Vec<u8>], materials: &[Material]) -> SceneGraphNode {
    let name = node
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()));
    let (translation, rotation, scale) = node.transform().decomposed();
    let local = Instance {
        position: translation.into(),
        rotation: rotation.into(),
        scale: scale.into(),
    };
    let scene_node = SceneGraphNode::new(name).with_transform(local);
    match node.mesh().and_then(|mesh| read_mesh(&mesh, buffers, materials)) {
        Some(mesh) => scene_node.with_mesh(mesh),
        None => scene_node,
    }
}

fn read_mesh(mesh: &gltf::Mesh, buffers: &[Vec<u8>], materials: &[Material]) -> Option<Mesh> {
    let mut positions: Vec<Point3<f32>> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();
    let mut material = None;
    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            warn!(
                "Skipping primitive {} of mesh {:?}: only triangle lists can be hit tested",
                primitive.index(),
                mesh.name()
            );
            continue;
        }
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
        let Some(vertex_attribute) = reader.read_positions() else {
            continue;
        };
        let offset = positions.len() as u32;
        positions.extend(vertex_attribute.map(Point3::from));
        let added = positions.len() as u32 - offset;
        match reader.read_indices() {
            Some(indices_raw) => indices.extend(indices_raw.into_u32().map(|i| i + offset)),
            None => indices.extend(offset..offset + added),
        }
        if material.is_none() {
            material = primitive
                .material()
                .index()
                .and_then(|idx| materials.get(idx))
                .cloned();
        }
    }
    if positions.is_empty() {
        return None;
    }
    let mut result = Mesh::new(mesh.name().unwrap_or("unknown_mesh"), positions, indices);
    if let Some(material) = material {
        result.material = material;
    }
    Some(result)
}
