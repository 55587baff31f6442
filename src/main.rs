//! # Punto de Entrada
//! src/main.rs
//!
//! Arranca el servidor con la configuración de CLI/entorno y registra las
//! rutas de demostración. Todo lo interesante vive en la biblioteca.

use mini_http::config::Config;
use mini_http::http::{response, Request, Response};
use mini_http::server::Server;
use serde_json::json;
use std::io::Write;
use std::process;

fn main() {
    println!("==================================");
    println!("   mini_http - Servidor HTTP/1.1");
    println!("==================================\n");

    let config = Config::new();
    if let Err(e) = config.validate() {
        eprintln!("[!] Configuración inválida: {}", e);
        process::exit(1);
    }
    config.print_summary();

    let server = Server::new(config);
    register_routes(&server);

    if let Err(e) = server.run() {
        eprintln!("[!] Error fatal del servidor: {}", e);
        process::exit(1);
    }
}

/// Rutas de demostración: respuestas vacías con status line propia, más un
/// endpoint JSON de estado
fn register_routes(server: &Server) {
    server.add_route("GET", "/messages", |_req: &Request, out: &mut dyn Write| {
        response::send_without_content(out, "200 Get")
    });

    server.add_route("POST", "/messages", |_req: &Request, out: &mut dyn Write| {
        response::send_without_content(out, "200 Post")
    });

    server.add_route("GET", "/status", |_req: &Request, out: &mut dyn Write| {
        let body = json!({
            "status": "running",
            "version": env!("CARGO_PKG_VERSION"),
        })
        .to_string();

        out.write_all(&Response::json(&body).to_bytes())?;
        out.flush()
    });
}
