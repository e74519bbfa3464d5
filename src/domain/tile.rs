/// Tile kinds and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TileKind {
    #[default]
    Empty,
    Wall,    // Fixed at generation time, blocks movement
    Special, // Walkable; stepping onto it starts an encounter
}

impl TileKind {
    /// Can the player occupy this cell?
    pub fn is_walkable(self) -> bool {
        !self.is_wall()
    }

    pub fn is_wall(self) -> bool {
        matches!(self, TileKind::Wall)
    }

    pub fn is_special(self) -> bool {
        matches!(self, TileKind::Special)
    }
}
