//! # Query Strings y Decodificación del Path
//! src/http/query.rs
//!
//! El target de la request line (`/path?a=1&b=2`) se separa en path y query.
//! La query se decodifica como `application/x-www-form-urlencoded` en una
//! secuencia ordenada de pares nombre→valor: el orden de inserción se
//! preserva y los nombres pueden repetirse, por eso es un `Vec` y no un mapa.
//! El path se decodifica con percent-decoding puro: en un path URI el `+` es
//! un carácter literal, no un espacio.

use percent_encoding::percent_decode_str;

/// Separa un target en (path decodificado, pares de query decodificados).
///
/// El path es todo lo anterior al primer `?`; la query, lo posterior.
///
/// # Ejemplo
/// ```
/// use mini_http::http::query::split_target;
///
/// let (path, params) = split_target("/buscar?q=hola%20mundo&q=otra");
/// assert_eq!(path, "/buscar");
/// assert_eq!(params, vec![
///     ("q".to_string(), "hola mundo".to_string()),
///     ("q".to_string(), "otra".to_string()),
/// ]);
/// ```
pub fn split_target(target: &str) -> (String, Vec<(String, String)>) {
    match target.split_once('?') {
        Some((raw_path, raw_query)) => (decode_path(raw_path), parse_pairs(raw_query)),
        None => (decode_path(target), Vec::new()),
    }
}

/// Decodifica una query string en pares ordenados nombre→valor.
///
/// `&`-separado, `=`-separado, percent-decoded, `+` como espacio. Un
/// parámetro sin `=` (ej: `?debug`) produce el par `("debug", "")`.
pub fn parse_pairs(raw_query: &str) -> Vec<(String, String)> {
    // El formato es tolerante por construcción: cualquier texto produce
    // algún conjunto de pares, igual que el parser de referencia
    serde_urlencoded::from_str::<Vec<(String, String)>>(raw_query).unwrap_or_default()
}

/// Decodifica los percent-escapes de un path URI.
///
/// A diferencia de la query, `+` se conserva literal. Secuencias inválidas
/// se reemplazan de forma lossy en vez de fallar el parse.
pub fn decode_path(raw_path: &str) -> String {
    percent_decode_str(raw_path).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_without_query() {
        let (path, params) = split_target("/index.html");
        assert_eq!(path, "/index.html");
        assert!(params.is_empty());
    }

    #[test]
    fn test_target_with_query() {
        let (path, params) = split_target("/messages?user=ana&limit=10");
        assert_eq!(path, "/messages");
        assert_eq!(
            params,
            vec![
                ("user".to_string(), "ana".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_preserves_order_and_duplicates() {
        let (_, params) = split_target("/x?b=2&a=1&b=3");
        assert_eq!(
            params,
            vec![
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_percent_and_plus_decoding() {
        let (_, params) = split_target("/x?text=hola%20mundo&otro=a+b");
        assert_eq!(params[0].1, "hola mundo");
        assert_eq!(params[1].1, "a b");
    }

    #[test]
    fn test_query_param_without_value() {
        let (_, params) = split_target("/x?debug&n=1");
        assert_eq!(params[0], ("debug".to_string(), "".to_string()));
        assert_eq!(params[1], ("n".to_string(), "1".to_string()));
    }

    #[test]
    fn test_path_percent_decoding() {
        let (path, params) = split_target("/archivos/con%20espacio.html");
        assert_eq!(path, "/archivos/con espacio.html");
        assert!(params.is_empty());
    }

    #[test]
    fn test_path_keeps_plus_literal() {
        // En el path, '+' no es un espacio
        let (path, _) = split_target("/a+b?x=c+d");
        assert_eq!(path, "/a+b");
    }

    #[test]
    fn test_empty_query() {
        let (path, params) = split_target("/x?");
        assert_eq!(path, "/x");
        assert!(params.is_empty());
    }
}
