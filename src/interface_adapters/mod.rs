// Interface adapters: drawing surface, readouts, and the terminal front end.

pub mod canvas;
pub mod readout;
pub mod terminal;
