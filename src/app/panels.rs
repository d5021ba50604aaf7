//! Panel identities.
//!
//! Every panel is a singleton with a fixed stacking priority, so the category
//! order (main below car detail below the editors) holds no matter in which
//! order panels were pushed.

/// Panels are singletons: each kind has one slot for its visibility marker
/// and the transient state behind it (selected car, editor draft). Pushing a
/// kind that is already on the stack would alias that slot, so the navigation
/// controller refuses it.
pub const SINGLETON_PANELS: bool = true;

/// The full-screen views of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PanelKind {
    /// Car list.
    Main,
    /// Fill-ups of one car.
    Car,
    /// Car add/edit form.
    EditCar,
    /// Fill-up add/edit form.
    EditFuel,
}

impl PanelKind {
    /// Stacking priority; higher values are drawn above lower ones.
    #[must_use]
    pub const fn z_order(self) -> u8 {
        match self {
            Self::Main => 0,
            Self::Car => 10,
            Self::EditCar => 20,
            Self::EditFuel => 30,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Car => "car",
            Self::EditCar => "edit-car",
            Self::EditFuel => "edit-fuel",
        }
    }
}

impl std::fmt::Display for PanelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
