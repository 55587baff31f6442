//! # Módulo Server
//!
//! Servidor TCP y despacho de conexiones:
//! - `tcp`: listener, dispatcher por conexión y ciclo de vida del servidor
//! - `pool`: pool fijo de workers que consume conexiones de una cola FIFO

pub mod pool;
pub mod tcp;

pub use pool::{ConnectionQueue, WorkerPool};
pub use tcp::Server;
