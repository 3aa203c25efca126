//! Area-weighted surface sampling and the particle cloud built from it.

use crate::asset::MeshData;
use crate::error::InvalidSceneGraphError;
use glam::Vec3;
use rand::Rng;

/// One particle as uploaded to the GPU: sampled position plus a random
/// jitter vector with every component in [-1, 1].
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointInstance {
    pub position: [f32; 3],
    pub random: [f32; 3],
}

/// Picks triangles with probability proportional to their area, then a
/// uniform point inside the chosen triangle.
pub struct MeshSurfaceSampler {
    triangles: Vec<[Vec3; 3]>,
    cumulative_area: Vec<f32>,
}

impl MeshSurfaceSampler {
    pub fn new(mesh: &MeshData) -> Result<Self, InvalidSceneGraphError> {
        let triangles: Vec<[Vec3; 3]> = mesh.triangles().collect();
        if triangles.is_empty() {
            return Err(InvalidSceneGraphError::EmptyGeometry);
        }
        let mut total = 0.0_f32;
        let cumulative_area = triangles
            .iter()
            .map(|[a, b, c]| {
                total += 0.5 * (*b - *a).cross(*c - *a).length();
                total
            })
            .collect::<Vec<_>>();
        if !(total > 0.0) || !total.is_finite() {
            return Err(InvalidSceneGraphError::ZeroSurfaceArea);
        }
        Ok(Self {
            triangles,
            cumulative_area,
        })
    }

    pub fn total_area(&self) -> f32 {
        self.cumulative_area.last().copied().unwrap_or(0.0)
    }

    fn pick_triangle(&self, r: f32) -> usize {
        // First triangle whose cumulative area exceeds r
        let idx = self.cumulative_area.partition_point(|&a| a <= r);
        idx.min(self.triangles.len() - 1)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let r = rng.gen::<f32>() * self.total_area();
        let [a, b, c] = self.triangles[self.pick_triangle(r)];
        let mut u = rng.gen::<f32>();
        let mut v = rng.gen::<f32>();
        if u + v > 1.0 {
            u = 1.0 - u;
            v = 1.0 - v;
        }
        a + (b - a) * u + (c - a) * v
    }
}

/// Particle representation derived once from a mesh.
#[derive(Clone, Debug, Default)]
pub struct PointCloud {
    instances: Vec<PointInstance>,
}

impl PointCloud {
    pub fn from_mesh<R: Rng + ?Sized>(
        mesh: &MeshData,
        count: usize,
        rng: &mut R,
    ) -> Result<Self, InvalidSceneGraphError> {
        let sampler = MeshSurfaceSampler::new(mesh)?;
        let instances = (0..count)
            .map(|_| {
                let p = sampler.sample(rng);
                PointInstance {
                    position: p.to_array(),
                    random: [
                        rng.gen::<f32>() * 2.0 - 1.0,
                        rng.gen::<f32>() * 2.0 - 1.0,
                        rng.gen::<f32>() * 2.0 - 1.0,
                    ],
                }
            })
            .collect();
        Ok(Self { instances })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    #[inline]
    pub fn instances(&self) -> &[PointInstance] {
        &self.instances
    }
}
