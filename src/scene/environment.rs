use crate::math::{rgb, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: [f32; 3],
        intensity: f32,
    },
    /// Parallel light shining from `position` towards the origin.
    Directional {
        color: [f32; 3],
        intensity: f32,
        position: Vec3,
        cast_shadow: bool,
    },
    Point {
        color: [f32; 3],
        intensity: f32,
        position: Vec3,
        /// Zero means no falloff cutoff.
        distance: f32,
    },
}

impl Light {
    pub fn ambient(color: u32, intensity: f32) -> Self {
        Light::Ambient {
            color: rgb(color),
            intensity,
        }
    }

    pub fn directional(color: u32, intensity: f32, position: Vec3) -> Self {
        Light::Directional {
            color: rgb(color),
            intensity,
            position,
            cast_shadow: true,
        }
    }

    pub fn point(color: u32, intensity: f32, position: Vec3, distance: f32) -> Self {
        Light::Point {
            color: rgb(color),
            intensity,
            position,
            distance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: [f32; 3],
    pub near: f32,
    pub far: f32,
}

/// Everything about a scene that is not a node: clear colour, fog, lights.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub background: [f32; 3],
    pub fog: Option<Fog>,
    pub lights: Vec<Light>,
}

impl Environment {
    pub fn new(background: u32) -> Self {
        Self {
            background: rgb(background),
            fog: None,
            lights: Vec::new(),
        }
    }

    pub fn with_fog(mut self, color: u32, near: f32, far: f32) -> Self {
        self.fog = Some(Fog {
            color: rgb(color),
            near,
            far,
        });
        self
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn point_lights(&self) -> impl Iterator<Item = &Light> + '_ {
        self.lights.iter().filter(|l| matches!(l, Light::Point { .. }))
    }
}
