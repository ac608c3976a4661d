/// Defines session phases and what input each accepts
pub trait Phase: Copy + Clone + PartialEq + Send + Sync + std::fmt::Debug + Default {
    fn allows_navigation(&self) -> bool;
    fn next(&self) -> Option<Self>;

    fn is_setup(&self) -> bool {
        false
    }
    fn is_search(&self) -> bool {
        false
    }
    fn is_debrief(&self) -> bool {
        false
    }
}

#[derive(Copy, Debug, Clone, PartialEq, Default)]
pub enum StandardPhase {
    /// Waiting for a participant number.
    #[default]
    Setup,
    Search,
    Debrief,
}

impl Phase for StandardPhase {
    fn allows_navigation(&self) -> bool {
        matches!(self, Self::Search)
    }
    fn next(&self) -> Option<Self> {
        use StandardPhase::*;
        Some(match self {
            Setup => Search,
            Search => Debrief,
            // next participant
            Debrief => Setup,
        })
    }

    fn is_setup(&self) -> bool {
        matches!(self, StandardPhase::Setup)
    }

    fn is_search(&self) -> bool {
        matches!(self, StandardPhase::Search)
    }

    fn is_debrief(&self) -> bool {
        matches!(self, StandardPhase::Debrief)
    }
}
