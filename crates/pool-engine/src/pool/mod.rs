pub mod ball;
pub mod bodies;
pub mod config;
pub mod placement;
pub mod pocket;
pub mod session;
pub mod settle;
pub mod shot;
pub mod solo;
pub mod status;
pub mod teleport;
pub mod turn;

#[cfg(test)]
pub mod testing;
