use wasm_bindgen::prelude::*;
use pool_engine::*;

mod game;
mod table;

use game::PortalPool;

pool_web::export_game!(PortalPool, "portal-pool");
