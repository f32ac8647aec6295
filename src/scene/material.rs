use crate::math::Color;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(usize);

impl MaterialId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Standard surface description. Copies are independent: editing one never
/// touches meshes that reference another.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub color: Color,
    pub emissive: Color,
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
}

impl Material {
    pub fn standard(color: Color) -> Self {
        Self {
            name: String::new(),
            color,
            emissive: Color::BLACK,
            roughness: 1.0,
            metalness: 0.0,
            opacity: 1.0,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Slot storage for materials. Released slots are handed out again by `insert`.
#[derive(Debug, Default)]
pub struct MaterialLibrary {
    slots: Vec<Option<Material>>,
    free: Vec<usize>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, material: Material) -> MaterialId {
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(material);
                MaterialId(index)
            }
            None => {
                self.slots.push(Some(material));
                MaterialId(self.slots.len() - 1)
            }
        }
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Inserts a copy of `id` with only the base color replaced.
    pub fn clone_with_color(&mut self, id: MaterialId, color: Color) -> Option<MaterialId> {
        let mut copy = self.get(id)?.clone();
        copy.color = color;
        Some(self.insert(copy))
    }

    pub fn release(&mut self, id: MaterialId) -> Option<Material> {
        let material = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        Some(material)
    }

    /// Number of live materials.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
