//! # Lectura Peek/Consume
//! src/http/stream.rs
//!
//! El parser necesita mirar los primeros bytes de la conexión para localizar
//! la request line y el bloque de headers, y después consumir esos mismos
//! bytes (y el body) desde la posición real del stream. En lugar de depender
//! de un stream rebobinable (mark/reset), `PeekReader` hace una única lectura
//! acotada por adelantado y expone consumos explícitos que primero drenan ese
//! buffer y luego continúan leyendo del stream subyacente.

use std::io::{self, Read};

/// Wrapper de lectura sobre el input de una conexión.
///
/// Al construirse hace una sola lectura de hasta `cap` bytes. `peeked()`
/// expone esos bytes completos para hacer aritmética de offsets; `skip` y
/// `read_exact_bytes` avanzan la posición de consumo real.
pub struct PeekReader<R: Read> {
    inner: R,

    /// Bytes leídos por adelantado (a lo sumo `cap`)
    buffer: Vec<u8>,

    /// Cuántos bytes del buffer ya fueron consumidos
    pos: usize,
}

impl<R: Read> PeekReader<R> {
    /// Crea el reader haciendo una única lectura de hasta `cap` bytes.
    ///
    /// La lectura puede retornar menos de `cap` bytes (request corto) o cero
    /// (el peer cerró sin enviar nada); ambos casos son válidos.
    pub fn new(mut inner: R, cap: usize) -> io::Result<Self> {
        let mut buffer = vec![0u8; cap];
        let n = inner.read(&mut buffer)?;
        buffer.truncate(n);

        Ok(Self {
            inner,
            buffer,
            pos: 0,
        })
    }

    /// Bytes leídos por adelantado, desde el inicio de la conexión.
    ///
    /// Siempre retorna el buffer completo, sin importar cuánto se haya
    /// consumido: los offsets calculados sobre él son estables.
    pub fn peeked(&self) -> &[u8] {
        &self.buffer
    }

    /// Avanza la posición de consumo `n` bytes.
    ///
    /// Primero avanza dentro del buffer; si `n` excede lo bufferizado, lee y
    /// descarta el resto del stream subyacente.
    pub fn skip(&mut self, n: usize) -> io::Result<()> {
        let buffered = self.buffer.len() - self.pos;
        let from_buffer = n.min(buffered);
        self.pos += from_buffer;

        let mut remaining = (n - from_buffer) as u64;
        while remaining > 0 {
            let copied = io::copy(&mut (&mut self.inner).take(remaining), &mut io::sink())?;
            if copied == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "stream terminó durante skip",
                ));
            }
            remaining -= copied;
        }

        Ok(())
    }

    /// Consume exactamente `n` bytes y los retorna.
    ///
    /// Toma primero lo que quede en el buffer y completa leyendo del stream
    /// subyacente. Si el stream termina antes de `n` bytes, retorna
    /// `UnexpectedEof`.
    ///
    /// `n` puede venir de un `Content-Length` declarado por el cliente, así
    /// que nunca se reserva memoria por adelantado: la lectura es incremental
    /// y solo crece con los bytes que realmente llegan.
    pub fn read_exact_bytes(&mut self, n: usize) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();

        let buffered = self.buffer.len() - self.pos;
        let from_buffer = n.min(buffered);
        out.extend_from_slice(&self.buffer[self.pos..self.pos + from_buffer]);
        self.pos += from_buffer;

        let needed = (n - from_buffer) as u64;
        if needed > 0 {
            let copied = (&mut self.inner).take(needed).read_to_end(&mut out)? as u64;
            if copied < needed {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "stream terminó antes de completar la lectura",
                ));
            }
        }

        Ok(out)
    }
}
