//! # Tabla de Rutas
//! src/router/mod.rs
//!
//! Mapea pares (método, path) a handlers con igualdad exacta de strings:
//! sin wildcards, sin normalización de trailing slash, sin case-folding del
//! método. La tabla se comparte entre todos los workers; en el uso previsto
//! se registra todo antes de servir, pero las lecturas concurrentes son
//! seguras aunque haya un registro tardío.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router::lookup → Handler → bytes escritos al sink
//! ```

use crate::http::Request;
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, RwLock};

/// Capacidad que atiende un request escribiendo la respuesta en el sink.
///
/// Un handler recibe el request parseado y el stream de salida de la
/// conexión; escribe ahí la respuesta completa (status line, headers, body).
/// Cualquier closure o fn con la firma correcta implementa el trait.
pub trait Handler: Send + Sync {
    fn handle(&self, request: &Request, out: &mut dyn Write) -> io::Result<()>;
}

impl<F> Handler for F
where
    F: Fn(&Request, &mut dyn Write) -> io::Result<()> + Send + Sync,
{
    fn handle(&self, request: &Request, out: &mut dyn Write) -> io::Result<()> {
        self(request, out)
    }
}

/// Resultado de buscar un handler para (método, path)
pub enum RouteLookup {
    /// Hay un handler registrado para el par exacto
    Found(Arc<dyn Handler>),

    /// El método tiene rutas registradas, pero no este path
    UnknownPath,

    /// No hay ninguna ruta registrada para este método
    UnknownMethod,
}

/// Tabla de rutas: método → (path → handler)
pub struct Router {
    routes: RwLock<HashMap<String, HashMap<String, Arc<dyn Handler>>>>,
}

impl Router {
    /// Crea un router vacío
    pub fn new() -> Self {
        Self {
            routes: RwLock::new(HashMap::new()),
        }
    }

    /// Registra una ruta con su handler.
    ///
    /// Si ya había un handler para el mismo (método, path), se sobrescribe.
    /// Toma `&self`: el lock interno permite registrar incluso con lecturas
    /// concurrentes en curso.
    ///
    /// # Ejemplo
    /// ```
    /// use mini_http::http::{response, Request};
    /// use mini_http::router::Router;
    ///
    /// let router = Router::new();
    /// router.add_route("GET", "/messages", |_req: &Request,
    ///                                       out: &mut dyn std::io::Write| {
    ///     response::send_without_content(out, "200 Get")
    /// });
    /// ```
    pub fn add_route<H: Handler + 'static>(&self, method: &str, path: &str, handler: H) {
        let mut routes = self.routes.write().unwrap();
        routes
            .entry(method.to_string())
            .or_default()
            .insert(path.to_string(), Arc::new(handler));
    }

    /// Busca el handler para (método, path) con igualdad exacta.
    ///
    /// Distingue "método sin rutas" de "path no registrado" porque el
    /// dispatcher trata distinto ambos casos (solo el segundo habilita el
    /// fallback de archivos estáticos para GET).
    pub fn lookup(&self, method: &str, path: &str) -> RouteLookup {
        let routes = self.routes.read().unwrap();

        match routes.get(method) {
            None => RouteLookup::UnknownMethod,
            Some(paths) => match paths.get(path) {
                // Se clona el Arc para no retener el lock durante el handler
                Some(handler) => RouteLookup::Found(Arc::clone(handler)),
                None => RouteLookup::UnknownPath,
            },
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
