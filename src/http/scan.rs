//! # Scanner de Bytes
//! src/http/scan.rs
//!
//! Primitiva de búsqueda de una secuencia literal de bytes dentro de una
//! ventana acotada de un buffer. Es la única herramienta con la que el parser
//! localiza el fin de la request line (`\r\n`) y el fin del bloque de
//! headers (`\r\n\r\n`): los límites del mensaje HTTP están definidos por
//! bytes exactos, así que no hay regex ni inspección de contenido.

use memchr::memmem;

/// Busca la primera ocurrencia completa de `target` en `buffer[start..limit)`.
///
/// Retorna el offset (relativo al inicio de `buffer`) donde empieza la
/// primera coincidencia, o `None` si no hay ninguna. La ventana se recorta al
/// tamaño real del buffer, y un `target` más largo que la ventana restante
/// retorna `None` sin acceso fuera de rango.
///
/// # Ejemplo
/// ```
/// use mini_http::http::scan::index_of;
///
/// let buffer = b"GET / HTTP/1.1\r\nHost: x\r\n\r\n";
/// assert_eq!(index_of(buffer, b"\r\n", 0, buffer.len()), Some(14));
/// assert_eq!(index_of(buffer, b"\r\n\r\n", 16, buffer.len()), Some(23));
/// assert_eq!(index_of(buffer, b"ZZZ", 0, buffer.len()), None);
/// ```
pub fn index_of(buffer: &[u8], target: &[u8], start: usize, limit: usize) -> Option<usize> {
    let limit = limit.min(buffer.len());
    if start >= limit || target.len() > limit - start {
        return None;
    }
    memmem::find(&buffer[start..limit], target).map(|pos| pos + start)
}
