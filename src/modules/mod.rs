// Module exports for pure logic
pub mod floats; // Float panels and the connectivity gate
pub mod tabs; // Main container selection
pub mod toggles; // Persisted checkbox bindings
