//! Keyboard shortcut documentation.

use imagoref_core::ShortcutRegistry;

/// Print all shortcuts to console.
pub fn print_all() {
    println!("\n=== Keyboard Shortcuts ===");
    for shortcut in ShortcutRegistry::all() {
        println!("  {:20} {}", shortcut.format(), shortcut.action.description());
    }
    println!("  {:20} {}", "Shift+Drag", "Maintain aspect ratio while resizing");
    println!("  {:20} {}", "Ctrl+Wheel", "Zoom under the pointer");
    println!("  {:20} {}", "Middle Drag", "Pan the view");
    println!();
}
