//! Input mode controller.
//!
//! Two radio groups decide which input surface is shown: the top-level mode
//! (existing file or custom topology) and, inside custom mode, the tab (paste
//! text or build with a form). The state is one value with a single
//! transition function, so exactly one surface is ever visible.

/// Top-level input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Pick a topology file held by the engine
    #[default]
    Existing,
    /// Supply a topology
    Custom,
}

/// Tab inside custom mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomTab {
    #[default]
    PasteDescriptor,
    BuildForm,
}

/// An operator radio selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Mode(Mode),
    Tab(CustomTab),
}

/// The input surface the operator is working with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    ExistingFile,
    PasteDescriptor,
    BuildForm,
}

/// Which blocks of the input panel are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub existing_block: bool,
    pub custom_block: bool,
    pub paste_block: bool,
    pub form_block: bool,
}

/// Mode × tab state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputState {
    mode: Mode,
    tab: CustomTab,
}

impl InputState {
    pub const fn new(mode: Mode, tab: CustomTab) -> Self {
        Self { mode, tab }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn tab(&self) -> CustomTab {
        self.tab
    }

    /// Apply an operator selection.
    ///
    /// Switching mode always shows the paste tab. Selecting the mode that is
    /// already active changes nothing. A tab may be chosen in either mode but
    /// is only visible in custom mode.
    pub fn transition(self, selection: Selection) -> Self {
        match selection {
            Selection::Mode(mode) if mode == self.mode => self,
            Selection::Mode(mode) => Self {
                mode,
                tab: CustomTab::PasteDescriptor,
            },
            Selection::Tab(tab) => Self { tab, ..self },
        }
    }

    /// The surface the builder reads from.
    pub fn surface(&self) -> Surface {
        match (self.mode, self.tab) {
            (Mode::Existing, _) => Surface::ExistingFile,
            (Mode::Custom, CustomTab::PasteDescriptor) => Surface::PasteDescriptor,
            (Mode::Custom, CustomTab::BuildForm) => Surface::BuildForm,
        }
    }

    /// Block visibility for this state.
    pub fn visibility(&self) -> Visibility {
        Visibility {
            existing_block: self.mode == Mode::Existing,
            custom_block: self.mode == Mode::Custom,
            paste_block: self.tab == CustomTab::PasteDescriptor,
            form_block: self.tab == CustomTab::BuildForm,
        }
    }
}
