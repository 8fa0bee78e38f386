pub mod subprocess_launcher;

pub use subprocess_launcher::SubprocessLauncher;
