//! Winit key events → viewer commands.

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// What the user asked the viewer to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    RandomClip,
    NextModel,
    PreviousModel,
    Exit,
}

/// Maps a physical key to its command.
#[must_use]
pub fn translate_key(physical_key: PhysicalKey) -> Option<ViewerCommand> {
    let PhysicalKey::Code(code) = physical_key else {
        return None;
    };

    match code {
        KeyCode::Space | KeyCode::KeyR => Some(ViewerCommand::RandomClip),
        KeyCode::ArrowRight | KeyCode::KeyN => Some(ViewerCommand::NextModel),
        KeyCode::ArrowLeft | KeyCode::KeyP => Some(ViewerCommand::PreviousModel),
        KeyCode::Escape => Some(ViewerCommand::Exit),
        _ => None,
    }
}

/// Commands fire on press only; auto-repeat is ignored.
#[must_use]
pub fn command_for(event: &KeyEvent) -> Option<ViewerCommand> {
    if event.state != ElementState::Pressed || event.repeat {
        return None;
    }
    translate_key(event.physical_key)
}
