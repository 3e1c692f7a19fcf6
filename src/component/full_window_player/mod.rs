mod main;

pub use main::FullWindowPlayer;
