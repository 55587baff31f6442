//! # Servidor TCP y Dispatcher
//! src/server/tcp.rs
//!
//! Ciclo de vida de una conexión, de punta a punta:
//!
//! ```text
//! Aceptada → Parseando → {400 | Despachando → {404 | 500 | handler | estático}} → Cerrada
//! ```
//!
//! Todos los caminos terminan con la conexión cerrada; no hay reintentos ni
//! keep-alive. Un fallo en una conexión nunca afecta a otra ni al accept
//! loop: los errores de parse y de routing se resuelven acá con una
//! respuesta de error, y los de transporte abandonan la conexión en
//! silencio (el socket ya no sirve para responder).

use crate::config::Config;
use crate::http::request::{ParseError, Request, PEEK_LIMIT};
use crate::http::response;
use crate::http::stream::PeekReader;
use crate::http::{Response, StatusCode};
use crate::router::{Handler, RouteLookup, Router};
use crate::server::pool::WorkerPool;
use crate::static_files::StaticFiles;
use std::io::{self, BufWriter, Write};
use std::net::{TcpListener, TcpStream};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

/// Servidor HTTP/1.1: listener + router + archivos estáticos
pub struct Server {
    config: Config,
    router: Arc<Router>,
    statics: Arc<StaticFiles>,
}

impl Server {
    /// Crea el servidor con el allow-list estático por defecto
    pub fn new(config: Config) -> Self {
        let statics = Arc::new(StaticFiles::with_defaults(&config.static_dir));

        Self {
            config,
            router: Arc::new(Router::new()),
            statics,
        }
    }

    /// Registra una ruta; pensado para llamarse antes de `run`
    pub fn add_route<H: Handler + 'static>(&self, method: &str, path: &str, handler: H) {
        self.router.add_route(method, path, handler);
    }

    /// Acceso al router compartido
    pub fn router(&self) -> Arc<Router> {
        Arc::clone(&self.router)
    }

    /// Hace bind en la dirección configurada y atiende conexiones para siempre
    pub fn run(&self) -> io::Result<()> {
        let address = self.config.address();
        println!("[*] Iniciando servidor en {}", address);

        let listener = TcpListener::bind(&address)?;
        println!("[+] Servidor escuchando en {}", address);

        self.run_with_listener(listener)
    }

    /// Atiende conexiones desde un listener ya creado.
    ///
    /// Separado de `run` para poder usar un puerto efímero en tests. El
    /// accept loop solo encola: el pool fijo de workers hace el resto.
    pub fn run_with_listener(&self, listener: TcpListener) -> io::Result<()> {
        let pool = WorkerPool::new(
            self.config.workers,
            Arc::clone(&self.router),
            Arc::clone(&self.statics),
        );
        println!("[*] Pool de workers: {}\n", pool.size());

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => pool.submit(stream),
                Err(e) => eprintln!("   Error al aceptar conexión: {}", e),
            }
        }

        Ok(())
    }
}

/// Atiende una conexión completa: parse, despacho, respuesta, cierre.
///
/// Se invoca una vez por conexión aceptada, desde un worker del pool. El
/// `Err` solo reporta fallos de transporte (para el log del worker); todo
/// fallo de parse o de routing ya fue respondido al cliente. La conexión se
/// cierra en todos los casos al soltar el stream.
pub fn handle_connection(
    stream: TcpStream,
    router: &Router,
    statics: &StaticFiles,
) -> io::Result<()> {
    let start = Instant::now();
    let peer = stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "desconocido".to_string());

    // Única lectura acotada por adelantado; los consumos posteriores del
    // parser continúan desde la posición real del stream
    let mut reader = PeekReader::new(&stream, PEEK_LIMIT)?;
    if reader.peeked().is_empty() {
        // El peer conectó y cerró sin enviar nada
        return Ok(());
    }

    let mut out = BufWriter::new(&stream);

    let request = match Request::parse(&mut reader) {
        Ok(request) => request,
        Err(ParseError::Io(e)) => return Err(e),
        Err(e) => {
            println!("   {} request malformado: {}", peer, e);
            return response::send_without_content(&mut out, &StatusCode::BadRequest.to_string());
        }
    };

    let outcome = dispatch(&request, router, statics, &mut out)?;
    out.flush()?;

    println!(
        "   {} {} {} → {} ({:.2}ms)",
        peer,
        request.method(),
        request.path(),
        outcome,
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(())
}

/// Resuelve un request ya parseado: handler registrado, fallback estático
/// para GET, o 404. Retorna una etiqueta del resultado para el log.
fn dispatch(
    request: &Request,
    router: &Router,
    statics: &StaticFiles,
    out: &mut dyn Write,
) -> io::Result<&'static str> {
    match router.lookup(request.method(), request.path()) {
        RouteLookup::Found(handler) => {
            // Un handler que falla (o entra en pánico) no voltea al worker:
            // se responde 500 y la conexión se cierra normalmente
            match catch_unwind(AssertUnwindSafe(|| handler.handle(request, &mut *out))) {
                Ok(Ok(())) => Ok("handler OK"),
                Ok(Err(e)) => {
                    eprintln!("   Handler falló para {} {}: {}", request.method(), request.path(), e);
                    respond_error(out, StatusCode::InternalServerError)
                }
                Err(_) => {
                    eprintln!("   Handler en pánico para {} {}", request.method(), request.path());
                    respond_error(out, StatusCode::InternalServerError)
                }
            }
        }

        RouteLookup::UnknownMethod => respond_error(out, StatusCode::NotFound),

        RouteLookup::UnknownPath => {
            // Solo GET tiene fallback de archivos estáticos
            if request.method() != "GET" {
                return respond_error(out, StatusCode::NotFound);
            }

            match statics.resolve(request.path()) {
                Some((bytes, content_type)) => {
                    let resp = Response::new(StatusCode::Ok)
                        .with_header("Content-Type", content_type)
                        .with_body_bytes(bytes);
                    out.write_all(&resp.to_bytes())?;
                    out.flush()?;
                    Ok("200 OK (estático)")
                }
                None => respond_error(out, StatusCode::NotFound),
            }
        }
    }
}

/// Respuesta de error sin contenido, con la etiqueta para el log
fn respond_error(out: &mut dyn Write, status: StatusCode) -> io::Result<&'static str> {
    response::send_without_content(out, &status.to_string())?;
    Ok(status.reason_phrase())
}
