//! # Módulo HTTP
//!
//! Implementa la parte del protocolo HTTP/1.1 que este servidor necesita,
//! sin frameworks HTTP de alto nivel:
//!
//! - Búsqueda literal de delimitadores en buffers (`scan`)
//! - Lectura con "peek" acotado sobre el stream de la conexión (`stream`)
//! - Parsing de requests (`request`) y de query strings (`query`)
//! - Construcción de responses (`response`) y status codes (`status`)
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path?query=value HTTP/1.1\r\n
//! Header-Name: Header-Value\r\n
//! Another-Header: Value\r\n
//! \r\n
//! ```
//!
//! Los límites de la request line y del bloque de headers se localizan por
//! los bytes exactos `\r\n` y `\r\n\r\n`; nunca por inspección de contenido.
//! El body solo se lee cuando el método no es GET y hay `Content-Length`.

pub mod query;    // Parsing de query strings y decodificación del path
pub mod request;  // Parsing de HTTP requests
pub mod response; // Construcción de HTTP responses
pub mod scan;     // Búsqueda de secuencias de bytes
pub mod status;   // Códigos de estado HTTP
pub mod stream;   // Lectura peek/consume sobre la conexión

// Re-exportamos los tipos principales
pub use request::{ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
pub use stream::PeekReader;
