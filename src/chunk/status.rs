/// Generation completeness of a stored chunk, ordered from blank to
/// fully generated. Only `Full` columns are renderable, with one
/// exception handled at decode time: the data-fixer upgrade path writes
/// `Empty` onto chunks that actually hold complete legacy terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChunkStatus {
    Empty,
    StructureStarts,
    StructureReferences,
    Biomes,
    Noise,
    Surface,
    Carvers,
    LiquidCarvers,
    Features,
    InitializeLight,
    Light,
    Spawn,
    Heightmaps,
    Full,
}

impl ChunkStatus {
    /// Parses a status id as written in chunk records. Unknown ids map
    /// to `Empty`, matching the upstream loader's `byId` fallback.
    pub fn from_id(id: &str) -> ChunkStatus {
        match id.strip_prefix("minecraft:").unwrap_or(id) {
            "empty" => ChunkStatus::Empty,
            "structure_starts" => ChunkStatus::StructureStarts,
            "structure_references" => ChunkStatus::StructureReferences,
            "biomes" => ChunkStatus::Biomes,
            "noise" => ChunkStatus::Noise,
            "surface" => ChunkStatus::Surface,
            "carvers" => ChunkStatus::Carvers,
            "liquid_carvers" => ChunkStatus::LiquidCarvers,
            "features" => ChunkStatus::Features,
            "initialize_light" => ChunkStatus::InitializeLight,
            "light" => ChunkStatus::Light,
            "spawn" => ChunkStatus::Spawn,
            "heightmaps" => ChunkStatus::Heightmaps,
            "full" => ChunkStatus::Full,
            _ => ChunkStatus::Empty,
        }
    }

    pub fn is_at_least(self, other: ChunkStatus) -> bool {
        self >= other
    }
}
