//! # mini_http
//! src/lib.rs
//!
//! Servidor HTTP/1.1 minimalista implementado desde cero: acepta conexiones
//! TCP, parsea los bytes crudos del request, despacha a handlers registrados
//! por (método, path) y, como fallback para GET, sirve archivos estáticos
//! desde un directorio fijo.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Parsing del protocolo (scanner de bytes, requests, responses)
//! - `router`: Tabla de rutas (método, path) → handler
//! - `server`: Servidor TCP, pool de workers y despacho por conexión
//! - `static_files`: Resolución de archivos estáticos con allow-list
//! - `config`: Configuración por CLI y variables de entorno
//!
//! ## Modelo de conexión
//!
//! Una conexión = un request = una response. Siempre se envía
//! `Connection: close` y se cierra el socket; no hay keep-alive ni
//! chunked transfer encoding.
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use mini_http::config::Config;
//! use mini_http::http::response;
//! use mini_http::server::Server;
//!
//! let server = Server::new(Config::default());
//! server.add_route("GET", "/messages", |_req: &mini_http::http::Request,
//!                                       out: &mut dyn std::io::Write| {
//!     response::send_without_content(out, "200 Get")
//! });
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod http;
pub mod router;
pub mod server;
pub mod static_files;

// Re-exportamos los tipos principales para facilitar su uso
pub use http::{Request, Response, StatusCode};
pub use router::{Handler, Router};
pub use server::Server;
pub use static_files::StaticFiles;
