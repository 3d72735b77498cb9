mod common;
mod engine;
mod overall;
mod personal;
