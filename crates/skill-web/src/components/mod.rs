//! Reusable UI components
//!
//! This module contains all shared components used across pages.

pub mod layout;
pub mod navbar;
pub mod sidebar;
pub mod card;
pub mod button;
pub mod icons;
pub mod instance_editor;
pub mod notifications;
pub mod install_skill_modal;
pub mod import_config_modal;
pub mod run;
pub mod result_card;
pub mod tooltip;
pub mod searchable_select;

// Re-export commonly used components
pub use layout::Layout;
pub use navbar::Navbar;
pub use sidebar::Sidebar;
pub use card::Card;
pub use button::Button;
pub use instance_editor::{
    InstanceEditor, InstanceEditorModal, InstanceData, Capabilities,
    ConfigKeyValueEditor, EnvironmentVariablePreview, CapabilitiesEditor,
};
pub use notifications::{NotificationContainer, use_notifications};
pub use install_skill_modal::{InstallSkillModal, use_install_skill_modal};
pub use import_config_modal::{ImportConfigModal, use_import_config_modal};
pub use result_card::ResultCard;
pub use tooltip::Tooltip;
pub use searchable_select::SearchableSelect;
