#![deny(warnings)]

//! Console front end for the Cheat card game.

pub mod app;
pub mod console;
