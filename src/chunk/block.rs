use std::sync::{Arc, OnceLock};

/// One entry of a decoded block palette: a namespaced block id plus its
/// property map. Cloning only bumps reference counts, so states can be
/// handed out freely from the per-pixel surface search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockState {
    name: Arc<str>,
    properties: Arc<[(String, String)]>,
}

fn strip_namespace(name: &str) -> &str {
    name.strip_prefix("minecraft:").unwrap_or(name)
}

impl BlockState {
    pub fn new(name: &str) -> Self {
        BlockState {
            name: Arc::from(name),
            properties: Arc::from(Vec::new()),
        }
    }

    pub fn with_properties(name: &str, properties: Vec<(String, String)>) -> Self {
        BlockState {
            name: Arc::from(name),
            properties: Arc::from(properties),
        }
    }

    pub fn air() -> Self {
        static AIR: OnceLock<BlockState> = OnceLock::new();
        AIR.get_or_init(|| BlockState::new("minecraft:air")).clone()
    }

    pub fn bedrock() -> Self {
        static BEDROCK: OnceLock<BlockState> = OnceLock::new();
        BEDROCK
            .get_or_init(|| BlockState::new("minecraft:bedrock"))
            .clone()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_air(&self) -> bool {
        matches!(
            strip_namespace(&self.name),
            "air" | "cave_air" | "void_air"
        )
    }

    /// The fluid occupying this block's cell, if any. Waterlogged blocks
    /// and inherently waterlogged plants count as water.
    pub fn fluid_state(&self) -> FluidState {
        match strip_namespace(&self.name) {
            "water" | "flowing_water" | "bubble_column" => return FluidState::Water,
            "lava" | "flowing_lava" => return FluidState::Lava,
            "kelp" | "kelp_plant" | "seagrass" | "tall_seagrass" => return FluidState::Water,
            _ => {}
        }

        if self.property("waterlogged") == Some("true") {
            FluidState::Water
        } else {
            FluidState::Empty
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FluidState {
    Empty,
    Water,
    Lava,
}

impl FluidState {
    pub fn is_empty(self) -> bool {
        self == FluidState::Empty
    }

    /// The solid-equivalent render block for this fluid. Used when the
    /// found surface block is a partial fluid cell that should still
    /// paint as the fluid itself.
    pub fn block_state(self) -> BlockState {
        match self {
            FluidState::Empty => BlockState::air(),
            FluidState::Water => BlockState::new("minecraft:water"),
            FluidState::Lava => BlockState::new("minecraft:lava"),
        }
    }
}
