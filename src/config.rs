//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración vía CLI y variables de entorno usando clap. Cada opción
//! tiene un default razonable, así que el binario arranca sin argumentos.
//!
//! # Ejemplo
//! ```bash
//! mini_http --port 8080 --workers 4
//! HTTP_PORT=8080 HTTP_WORKERS=4 mini_http
//! ```

use clap::Parser;

/// Configuración del servidor HTTP
#[derive(Debug, Clone, Parser)]
#[command(name = "mini_http")]
#[command(about = "Servidor HTTP/1.1 minimalista con pool fijo de workers")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "9999", env = "HTTP_PORT")]
    pub port: u16,

    /// Host o IP en el que escucha el servidor
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Cantidad de workers del pool (fija, no depende de la carga)
    #[arg(short, long, default_value = "2", env = "HTTP_WORKERS")]
    pub workers: usize,

    /// Directorio raíz de archivos estáticos
    #[arg(long = "static-dir", default_value = "./public", env = "STATIC_DIR")]
    pub static_dir: String,
}

impl Config {
    /// Crea la configuración desde los argumentos del proceso
    pub fn new() -> Self {
        Config::parse()
    }

    /// Dirección completa para el bind del listener
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida que la configuración sea usable
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("La cantidad de workers debe ser al menos 1".to_string());
        }

        if self.host.trim().is_empty() {
            return Err("El host no puede estar vacío".to_string());
        }

        if self.static_dir.trim().is_empty() {
            return Err("El directorio de estáticos no puede estar vacío".to_string());
        }

        Ok(())
    }

    /// Imprime un resumen de la configuración activa
    pub fn print_summary(&self) {
        println!("Configuración:");
        println!("   Dirección:  {}", self.address());
        println!("   Workers:    {}", self.workers);
        println!("   Estáticos:  {}", self.static_dir);
        println!();
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 9999,
            host: "127.0.0.1".to_string(),
            workers: 2,
            static_dir: "./public".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.port, 9999);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.workers, 2);
        assert_eq!(config.static_dir, "./public");
    }

    #[test]
    fn test_address_format() {
        let config = Config {
            host: "0.0.0.0".to_string(),
            port: 8080,
            ..Config::default()
        };

        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_validate_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_workers() {
        let config = Config {
            workers: 0,
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_host() {
        let config = Config {
            host: "  ".to_string(),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_from_args() {
        let config =
            Config::parse_from(["mini_http", "--port", "8080", "--workers", "4"]);

        assert_eq!(config.port, 8080);
        assert_eq!(config.workers, 4);
        assert_eq!(config.host, "127.0.0.1");
    }
}
