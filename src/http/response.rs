//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! API para construir respuestas HTTP/1.1 de forma programática y
//! convertirlas a bytes. Toda respuesta lleva `Connection: close`: el
//! servidor cierra la conexión después de responder, siempre.
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 13\r\n
//! Connection: close\r\n
//! \r\n
//! <body opcional>
//! ```
//!
//! Los handlers también pueden escribir directo al sink con
//! [`send_without_content`], útil para respuestas vacías con status line
//! propia (ej: `200 Get`).

use super::StatusCode;
use std::collections::HashMap;
use std::io::{self, Write};

/// Representa una respuesta HTTP/1.1 completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP (200, 404, etc.)
    status: StatusCode,

    /// Reason phrase alternativa para la status line (ej: "Get" → "200 Get")
    reason: Option<String>,

    /// Headers HTTP; HashMap para evitar duplicados
    headers: HashMap<String, String>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,
}

impl Response {
    /// Crea una nueva respuesta con el código de estado especificado.
    ///
    /// Arranca con `Connection: close` como único header y sin body.
    ///
    /// # Ejemplo
    /// ```
    /// use mini_http::http::{Response, StatusCode};
    ///
    /// let response = Response::new(StatusCode::Ok);
    /// ```
    pub fn new(status: StatusCode) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Connection".to_string(), "close".to_string());

        Self {
            status,
            reason: None,
            headers,
            body: Vec::new(),
        }
    }

    /// Crea una respuesta sin contenido: `Content-Length: 0` y sin body.
    ///
    /// Es la forma de las respuestas de error del dispatcher (400/404/500).
    ///
    /// # Ejemplo
    /// ```
    /// use mini_http::http::{Response, StatusCode};
    ///
    /// let bytes = Response::without_content(StatusCode::NotFound).to_bytes();
    /// assert!(bytes.starts_with(b"HTTP/1.1 404 Not Found\r\n"));
    /// ```
    pub fn without_content(status: StatusCode) -> Self {
        Self::new(status).with_header("Content-Length", "0")
    }

    /// Reemplaza la reason phrase de la status line conservando el código.
    ///
    /// # Ejemplo
    /// ```
    /// use mini_http::http::{Response, StatusCode};
    ///
    /// let response = Response::without_content(StatusCode::Ok).with_reason("Get");
    /// assert!(response.to_bytes().starts_with(b"HTTP/1.1 200 Get\r\n"));
    /// ```
    pub fn with_reason(mut self, reason: &str) -> Self {
        self.reason = Some(reason.to_string());
        self
    }

    /// Agrega un header a la respuesta. Si ya existe, se sobrescribe.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Agrega un header a una respuesta existente (versión mutable)
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    /// Establece el cuerpo desde un string.
    ///
    /// Automáticamente calcula y agrega el header `Content-Length`.
    pub fn with_body(self, body: &str) -> Self {
        self.with_body_bytes(body.as_bytes().to_vec())
    }

    /// Establece el cuerpo desde bytes.
    ///
    /// Útil para respuestas binarias (imágenes, etc.). También calcula
    /// `Content-Length`.
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.headers
            .insert("Content-Length".to_string(), body.len().to_string());
        self.body = body;
        self
    }

    /// Crea una respuesta JSON exitosa (200 OK).
    ///
    /// # Ejemplo
    /// ```
    /// use mini_http::http::Response;
    ///
    /// let response = Response::json(r#"{"status": "ok"}"#);
    /// ```
    pub fn json(body: &str) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Content-Type", "application/json")
            .with_body(body)
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket.
    ///
    /// Genera status line, headers, línea vacía y body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::new();

        // 1. Status line: HTTP/1.1 200 OK\r\n
        let reason = match &self.reason {
            Some(custom) => custom.as_str(),
            None => self.status.reason_phrase(),
        };
        let status_line = format!("HTTP/1.1 {} {}\r\n", self.status.as_u16(), reason);
        result.extend_from_slice(status_line.as_bytes());

        // 2. Headers: Nombre: Valor\r\n
        for (name, value) in &self.headers {
            let header_line = format!("{}: {}\r\n", name, value);
            result.extend_from_slice(header_line.as_bytes());
        }

        // 3. Línea vacía que separa headers del body
        result.extend_from_slice(b"\r\n");

        // 4. Body (si existe)
        result.extend_from_slice(&self.body);

        result
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene una referencia a los headers
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Escribe en el sink una respuesta sin contenido con la status line dada.
///
/// Equivalente directo a lo que hacen los handlers mínimos: status line
/// arbitraria (`"200 Get"`, `"404 Not Found"`, ...), `Content-Length: 0`,
/// `Connection: close`, flush.
///
/// # Ejemplo
/// ```
/// use mini_http::http::response::send_without_content;
///
/// let mut out: Vec<u8> = Vec::new();
/// send_without_content(&mut out, "200 Get").unwrap();
/// assert_eq!(
///     out,
///     b"HTTP/1.1 200 Get\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
/// );
/// ```
pub fn send_without_content(out: &mut dyn Write, status_text: &str) -> io::Result<()> {
    write!(
        out,
        "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        status_text
    )?;
    out.flush()
}
