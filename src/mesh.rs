//! Vertex/triangle assembly: turns parsed mesh data into the scene's flat
//! vertex and triangle arrays, accumulating smooth normals along the way.

use crate::geometry::{Triangle, TriangleFlags, Vertex};
use crate::util::{Error, Result, Vector3};

/// One parsed mesh, as handed over by the loader: flat position/uv arrays
/// plus an index buffer. Not retained after [`add_mesh`] runs.
pub struct MeshData<'a> {
    pub positions: &'a [Vector3],
    /// Either empty (all uvs default to zero) or the same length as `positions`.
    pub uvs: &'a [Vector3],
    /// Triangle indices, local to this mesh; length must be a multiple of 3.
    pub indices: &'a [u32],
    pub material_index: u32,
    pub flags: TriangleFlags,
}

/// Append `mesh` onto `vertices`/`triangles`, accumulating face normals into
/// each referenced vertex. Caller must invoke [`finish_normals`] once every
/// mesh in the scene has been added.
pub fn add_mesh(vertices: &mut Vec<Vertex>, triangles: &mut Vec<Triangle>, mesh: &MeshData) -> Result<()> {
    if mesh.indices.len() % 3 != 0 {
        return Err(Error::scene("mesh triangle index count is not a multiple of 3"));
    }
    if !mesh.uvs.is_empty() && mesh.uvs.len() != mesh.positions.len() {
        return Err(Error::scene("mesh uv count does not match vertex count"));
    }

    let base = vertices.len() as u32;
    vertices.reserve(mesh.positions.len());
    for (i, &position) in mesh.positions.iter().enumerate() {
        let uv = mesh.uvs.get(i).copied().unwrap_or(Vector3::ZERO);
        vertices.push(Vertex::new(position, uv));
    }

    triangles.reserve(mesh.indices.len() / 3);
    for tri in mesh.indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0], tri[1], tri[2]);
        for &i in &[i0, i1, i2] {
            if i as usize >= mesh.positions.len() {
                return Err(Error::scene(format!("triangle index {i} out of range")));
            }
        }
        let triangle = Triangle::new(vertices, base + i0, base + i1, base + i2, mesh.material_index, mesh.flags);
        vertices[(base + i0) as usize].normal += triangle.face_normal;
        vertices[(base + i1) as usize].normal += triangle.face_normal;
        vertices[(base + i2) as usize].normal += triangle.face_normal;
        triangles.push(triangle);
    }

    Ok(())
}

/// Normalize every vertex's accumulated normal. Call once after all meshes
/// have been added; a vertex touched by zero triangles keeps a zero normal.
pub fn finish_normals(vertices: &mut [Vertex]) {
    for v in vertices.iter_mut() {
        if v.normal != Vector3::ZERO {
            v.normal = v.normal.normalize();
        }
    }
}
