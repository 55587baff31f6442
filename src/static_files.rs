//! # Archivos Estáticos
//! src/static_files.rs
//!
//! Colaborador de archivos estáticos del dispatcher: ante un GET sin handler
//! registrado, resuelve el path contra un allow-list fijo y un directorio
//! raíz. El allow-list enumera los únicos recursos servibles, así que un path
//! arbitrario (incluido cualquier intento de traversal) nunca llega al
//! filesystem.

use std::fs;
use std::path::PathBuf;

/// Recursos estáticos servibles por defecto
pub const DEFAULT_ALLOWED: &[&str] = &[
    "/index.html",
    "/spring.svg",
    "/spring.png",
    "/resources.html",
    "/styles.css",
    "/app.js",
    "/links.html",
    "/forms.html",
    "/classic.html",
    "/events.html",
    "/events.js",
];

/// Resolución de archivos estáticos con allow-list
pub struct StaticFiles {
    /// Directorio raíz desde donde se sirven los archivos
    root: PathBuf,

    /// Paths de request permitidos (igualdad exacta)
    allowed: Vec<String>,
}

impl StaticFiles {
    /// Crea el resolutor con un allow-list propio
    pub fn new(root: impl Into<PathBuf>, allowed: &[&str]) -> Self {
        Self {
            root: root.into(),
            allowed: allowed.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Crea el resolutor con el allow-list por defecto
    pub fn with_defaults(root: impl Into<PathBuf>) -> Self {
        Self::new(root, DEFAULT_ALLOWED)
    }

    /// Resuelve un path de request a (bytes del archivo, content type).
    ///
    /// Retorna `None` si el path no está en el allow-list o si el archivo no
    /// existe (o no se puede leer) bajo el directorio raíz: ambos casos son
    /// un 404 para el dispatcher.
    ///
    /// # Ejemplo
    /// ```no_run
    /// use mini_http::static_files::StaticFiles;
    ///
    /// let statics = StaticFiles::with_defaults("./public");
    /// if let Some((bytes, content_type)) = statics.resolve("/index.html") {
    ///     assert_eq!(content_type, "text/html");
    ///     assert!(!bytes.is_empty());
    /// }
    /// ```
    pub fn resolve(&self, path: &str) -> Option<(Vec<u8>, &'static str)> {
        if !self.allowed.iter().any(|allowed| allowed == path) {
            return None;
        }

        let file_path = self.root.join(path.trim_start_matches('/'));
        let bytes = fs::read(&file_path).ok()?;

        Some((bytes, content_type_for(path)))
    }
}

/// Content type según la extensión del archivo
fn content_type_for(path: &str) -> &'static str {
    match path.rsplit('.').next() {
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("json") => "application/json",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
