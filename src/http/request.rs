//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser del lado servidor: localiza la request line y el bloque de headers
//! mediante los delimitadores exactos `\r\n` y `\r\n\r\n`, y lee el body solo
//! cuando el método no es GET y hay un `Content-Length` declarado.
//!
//! ## Algoritmo
//!
//! 1. Una única lectura de hasta [`PEEK_LIMIT`] bytes ([`PeekReader`]).
//! 2. `\r\n` delimita la request line; se separa en exactamente 3 tokens
//!    (método, target, versión). La versión se parsea pero no se valida.
//! 3. El target se divide en path (percent-decoded) y pares de query.
//! 4. `\r\n\r\n` delimita el bloque de headers, buscado a partir del fin de
//!    la request line. Si no aparece dentro del buffer acotado, el request es
//!    malformado: el límite de tamaño es deliberado, no hay lecturas extra.
//! 5. Los headers se re-adquieren desde la posición real del stream y se
//!    guardan como líneas crudas `"Nombre: valor"`, sin validar su forma.
//! 6. Para métodos != GET se busca `Content-Length` y se consumen exactamente
//!    esos bytes como body. Un valor no numérico falla el parse.

use super::query;
use super::scan;
use super::stream::PeekReader;
use std::io::{self, Cursor, Read};

/// Cantidad máxima de bytes leídos por adelantado para localizar la request
/// line y los headers. Un bloque de headers que no entra aquí es malformado.
pub const PEEK_LIMIT: usize = 4096;

/// Delimitador de la request line
const REQUEST_LINE_DELIMITER: &[u8] = b"\r\n";

/// Delimitador del fin del bloque de headers
const HEADERS_DELIMITER: &[u8] = b"\r\n\r\n";

/// Representa un request HTTP parseado.
///
/// Inmutable después de su construcción; se crea una vez por conexión y se
/// descarta al terminar el handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Método HTTP tal como llegó ("GET", "POST", ...)
    method: String,

    /// Path de la petición, sin query string y con percent-escapes decodificados
    path: String,

    /// Pares nombre→valor de la query, en orden de aparición (puede haber repetidos)
    query_params: Vec<(String, String)>,

    /// Headers como líneas crudas "Nombre: valor"
    headers: Vec<String>,

    /// Body del request; vacío para GET o sin Content-Length
    body: Vec<u8>,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug)]
pub enum ParseError {
    /// La request line no termina en `\r\n` o no tiene exactamente 3 tokens
    InvalidRequestLine,

    /// No apareció `\r\n\r\n` dentro del buffer acotado
    MissingHeadersEnd,

    /// El valor de Content-Length no es un entero no negativo
    InvalidContentLength(String),

    /// Fallo de E/S leyendo del socket: se abandona la conexión sin responder
    Io(io::Error),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidRequestLine => write!(f, "Invalid request line format"),
            ParseError::MissingHeadersEnd => {
                write!(f, "Headers terminator not found within the read limit")
            }
            ParseError::InvalidContentLength(v) => {
                write!(f, "Invalid Content-Length value: {}", v)
            }
            ParseError::Io(e) => write!(f, "I/O error while reading request: {}", e),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(e: io::Error) -> Self {
        ParseError::Io(e)
    }
}

impl Request {
    /// Parsea un request desde el input de una conexión.
    ///
    /// # Retorna
    ///
    /// * `Ok(Request)` - Request parseado exitosamente
    /// * `Err(ParseError)` - Request malformado o fallo de E/S
    pub fn parse<R: Read>(reader: &mut PeekReader<R>) -> Result<Self, ParseError> {
        let (method, path, query_params, headers_start, headers_len) = {
            let buffer = reader.peeked();
            let n = buffer.len();

            // Localizar la request line
            let line_end = scan::index_of(buffer, REQUEST_LINE_DELIMITER, 0, n)
                .ok_or(ParseError::InvalidRequestLine)?;
            let request_line = std::str::from_utf8(&buffer[..line_end])
                .map_err(|_| ParseError::InvalidRequestLine)?;

            // Debe tener exactamente 3 tokens: METHOD TARGET VERSION.
            // La versión (parts[2]) se parsea pero no se valida ni se usa.
            let parts: Vec<&str> = request_line.split(' ').collect();
            if parts.len() != 3 {
                return Err(ParseError::InvalidRequestLine);
            }
            let method = parts[0].to_string();

            // Separar path y query del target
            let (path, query_params) = query::split_target(parts[1]);

            // Localizar el fin de los headers dentro del buffer acotado,
            // buscando a partir del fin de la request line
            let headers_start = line_end + REQUEST_LINE_DELIMITER.len();
            let headers_end = scan::index_of(buffer, HEADERS_DELIMITER, headers_start, n)
                .ok_or(ParseError::MissingHeadersEnd)?;

            (
                method,
                path,
                query_params,
                headers_start,
                headers_end - headers_start,
            )
        };

        // Re-adquirir los headers desde la posición real del stream:
        // saltar la request line y consumir exactamente el bloque de headers
        reader.skip(headers_start)?;
        let headers_bytes = reader.read_exact_bytes(headers_len)?;
        let headers: Vec<String> = String::from_utf8_lossy(&headers_bytes)
            .split("\r\n")
            .map(str::to_string)
            .collect();

        // Para GET no hay body; para el resto, solo si hay Content-Length
        let mut body = Vec::new();
        if method != "GET" {
            reader.skip(HEADERS_DELIMITER.len())?;

            if let Some(value) = lookup_header(&headers, "Content-Length") {
                let length: usize = value
                    .parse()
                    .map_err(|_| ParseError::InvalidContentLength(value.to_string()))?;
                body = reader.read_exact_bytes(length)?;
            }
        }

        Ok(Request {
            method,
            path,
            query_params,
            headers,
            body,
        })
    }

    /// Parsea un request desde un buffer en memoria.
    ///
    /// # Ejemplo
    /// ```
    /// use mini_http::http::Request;
    ///
    /// let raw = b"GET /messages?user=ana HTTP/1.1\r\nHost: localhost\r\n\r\n";
    /// let request = Request::from_bytes(raw).unwrap();
    ///
    /// assert_eq!(request.method(), "GET");
    /// assert_eq!(request.path(), "/messages");
    /// assert_eq!(request.query_param("user"), Some("ana"));
    /// ```
    pub fn from_bytes(raw: &[u8]) -> Result<Self, ParseError> {
        let mut reader = PeekReader::new(Cursor::new(raw), PEEK_LIMIT)?;
        Self::parse(&mut reader)
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Obtiene el path del request (sin query string)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene los pares de la query en orden de aparición
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query_params
    }

    /// Obtiene el primer valor de un query parameter
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value.as_str())
    }

    /// Obtiene los headers como líneas crudas "Nombre: valor"
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Busca un header por nombre con coincidencia de prefijo.
    ///
    /// La línea debe empezar con `name`; el valor es lo que sigue al primer
    /// espacio. Un nombre similar más largo (`Content-Length-Extra`) también
    /// coincide al buscar `Content-Length`.
    pub fn header(&self, name: &str) -> Option<&str> {
        lookup_header(&self.headers, name)
    }

    /// Obtiene el body del request
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Obtiene el body del request como String
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }
}

/// Búsqueda laxa de un header entre líneas crudas: prefijo + primer espacio.
fn lookup_header<'a>(headers: &'a [String], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|line| line.starts_with(name))
        .and_then(|line| line.find(' ').map(|idx| line[idx..].trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_get() {
        let raw = b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let request = Request::from_bytes(raw).unwrap();

        assert_eq!(request.method(), "GET");
        assert_eq!(request.path(), "/");
        assert!(request.query_params().is_empty());
        assert!(request.body().is_empty());
    }

    #[test]
    fn test_parse_with_path() {
        let raw = b"GET /messages HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let request = Request::from_bytes(raw).unwrap();

        assert_eq!(request.path(), "/messages");
    }

    #[test]
    fn test_parse_with_query_params() {
        let raw = b"GET /messages?user=ana&limit=10 HTTP/1.1\r\nHost: x\r\n\r\n";
        let request = Request::from_bytes(raw).unwrap();

        assert_eq!(request.path(), "/messages");
        assert_eq!(request.query_param("user"), Some("ana"));
        assert_eq!(request.query_param("limit"), Some("10"));
    }

    #[test]
    fn test_query_params_keep_order_and_duplicates() {
        let raw = b"GET /x?b=2&a=1&b=3 HTTP/1.1\r\nHost: x\r\n\r\n";
        let request = Request::from_bytes(raw).unwrap();

        assert_eq!(
            request.query_params(),
            &[
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "3".to_string()),
            ]
        );
        // query_param retorna la primera coincidencia
        assert_eq!(request.query_param("b"), Some("2"));
    }

    #[test]
    fn test_query_url_decode() {
        let raw = b"GET /reverse?text=hola%20mundo HTTP/1.1\r\nHost: x\r\n\r\n";
        let request = Request::from_bytes(raw).unwrap();

        assert_eq!(request.query_param("text"), Some("hola mundo"));
    }

    #[test]
    fn test_path_url_decode() {
        let raw = b"GET /con%20espacio?x=1 HTTP/1.1\r\nHost: x\r\n\r\n";
        let request = Request::from_bytes(raw).unwrap();

        assert_eq!(request.path(), "/con espacio");
    }

    #[test]
    fn test_version_is_not_validated() {
        let raw = b"GET / HTTP/9.9\r\nHost: x\r\n\r\n";
        assert!(Request::from_bytes(raw).is_ok());
    }

    #[test]
    fn test_headers_are_raw_lines() {
        let raw = b"GET / HTTP/1.1\r\nHost: localhost:9999\r\nAccept: */*\r\n\r\n";
        let request = Request::from_bytes(raw).unwrap();

        assert_eq!(
            request.headers(),
            &["Host: localhost:9999".to_string(), "Accept: */*".to_string()]
        );
        assert_eq!(request.header("Host"), Some("localhost:9999"));
        assert_eq!(request.header("Accept"), Some("*/*"));
        assert_eq!(request.header("Missing"), None);
    }

    #[test]
    fn test_request_line_two_tokens() {
        let raw = b"GET /\r\nHost: x\r\n\r\n";
        let result = Request::from_bytes(raw);

        assert!(matches!(result, Err(ParseError::InvalidRequestLine)));
    }

    #[test]
    fn test_request_line_four_tokens() {
        let raw = b"GET /a /b HTTP/1.1\r\nHost: x\r\n\r\n";
        let result = Request::from_bytes(raw);

        assert!(matches!(result, Err(ParseError::InvalidRequestLine)));
    }

    #[test]
    fn test_missing_request_line_terminator() {
        let raw = b"GET / HTTP/1.1";
        let result = Request::from_bytes(raw);

        assert!(matches!(result, Err(ParseError::InvalidRequestLine)));
    }

    #[test]
    fn test_empty_input() {
        let result = Request::from_bytes(b"");
        assert!(matches!(result, Err(ParseError::InvalidRequestLine)));
    }

    #[test]
    fn test_missing_headers_terminator() {
        let raw = b"GET / HTTP/1.1\r\nHost: localhost";
        let result = Request::from_bytes(raw);

        assert!(matches!(result, Err(ParseError::MissingHeadersEnd)));
    }

    #[test]
    fn test_headers_terminator_beyond_peek_limit() {
        // El terminador existe, pero después de los primeros 4096 bytes
        let mut raw = b"GET / HTTP/1.1\r\nX-Filler: ".to_vec();
        raw.extend(std::iter::repeat(b'a').take(PEEK_LIMIT));
        raw.extend_from_slice(b"\r\n\r\n");

        let result = Request::from_bytes(&raw);
        assert!(matches!(result, Err(ParseError::MissingHeadersEnd)));
    }

    #[test]
    fn test_request_without_headers_is_malformed() {
        // El terminador se busca después de la request line, así que un
        // request sin ningún header no lo tiene donde se espera
        let raw = b"GET / HTTP/1.1\r\n\r\n";
        let result = Request::from_bytes(raw);

        assert!(matches!(result, Err(ParseError::MissingHeadersEnd)));
    }

    #[test]
    fn test_get_ignores_content_length() {
        let raw = b"GET /x HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
        let request = Request::from_bytes(raw).unwrap();

        assert!(request.body().is_empty());
    }

    #[test]
    fn test_post_reads_exact_body() {
        let raw = b"POST /messages HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
        let request = Request::from_bytes(raw).unwrap();

        assert_eq!(request.body(), b"hello");
        assert_eq!(request.body_string(), Some("hello".to_string()));
    }

    #[test]
    fn test_post_body_stops_at_content_length() {
        // No se leen bytes de más aunque haya más datos disponibles
        let raw = b"POST /x HTTP/1.1\r\nContent-Length: 5\r\n\r\nholamundo";
        let request = Request::from_bytes(raw).unwrap();

        assert_eq!(request.body(), b"holam");
    }

    #[test]
    fn test_post_without_content_length() {
        // Sin Content-Length el body queda vacío: no se lee hasta el cierre
        let raw = b"POST /x HTTP/1.1\r\nHost: x\r\n\r\nignorado";
        let request = Request::from_bytes(raw).unwrap();

        assert!(request.body().is_empty());
    }

    #[test]
    fn test_invalid_content_length() {
        let raw = b"POST /x HTTP/1.1\r\nContent-Length: abc\r\n\r\n";
        let result = Request::from_bytes(raw);

        assert!(matches!(result, Err(ParseError::InvalidContentLength(_))));
    }

    #[test]
    fn test_huge_content_length_is_error_not_panic() {
        // Un Content-Length gigante no debe reservar memoria ni abortar el
        // proceso: al no llegar los bytes prometidos, el parse falla como
        // fallo de transporte
        let raw = b"POST /x HTTP/1.1\r\nContent-Length: 18446744073709551615\r\n\r\n";
        let result = Request::from_bytes(raw);
        assert!(matches!(result, Err(ParseError::Io(_))));

        let raw = b"POST /x HTTP/1.1\r\nContent-Length: 1000000000000000\r\n\r\nabc";
        let result = Request::from_bytes(raw);
        assert!(matches!(result, Err(ParseError::Io(_))));
    }

    #[test]
    fn test_negative_content_length() {
        let raw = b"POST /x HTTP/1.1\r\nContent-Length: -5\r\n\r\n";
        let result = Request::from_bytes(raw);

        assert!(matches!(result, Err(ParseError::InvalidContentLength(_))));
    }

    #[test]
    fn test_header_lookup_is_prefix_match() {
        // La búsqueda es por prefijo: "Content-Length-Extra" también coincide
        // al buscar "Content-Length". Comportamiento preservado a propósito.
        let raw = b"POST /x HTTP/1.1\r\nContent-Length-Extra: 3\r\n\r\nabc";
        let request = Request::from_bytes(raw).unwrap();

        assert_eq!(request.header("Content-Length"), Some("3"));
        assert_eq!(request.body(), b"abc");
    }

    #[test]
    fn test_header_without_space_has_no_value() {
        // Una línea que coincide por prefijo pero no tiene espacio no aporta
        // valor: el header se trata como ausente
        let raw = b"POST /x HTTP/1.1\r\nContent-Length:5\r\n\r\nhello";
        let request = Request::from_bytes(raw).unwrap();

        assert_eq!(request.header("Content-Length"), None);
        assert!(request.body().is_empty());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let raw = b"POST /m?a=1&a=2 HTTP/1.1\r\nContent-Length: 4\r\nHost: x\r\n\r\ndata";
        let first = Request::from_bytes(raw).unwrap();
        let second = Request::from_bytes(raw).unwrap();

        assert_eq!(first, second);
    }
}
