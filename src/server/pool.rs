//! # Pool de Workers
//! src/server/pool.rs
//!
//! Pool de tamaño fijo que consume conexiones aceptadas desde una cola FIFO
//! thread-safe. El loop de accept solo encola; cada worker desencola una
//! conexión, la atiende hasta terminar y vuelve por la siguiente. El tamaño
//! se fija al arrancar y no depende de la carga.

use crate::router::Router;
use crate::server::tcp;
use crate::static_files::StaticFiles;
use std::collections::VecDeque;
use std::net::TcpStream;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;

/// Cola FIFO thread-safe de conexiones aceptadas
pub struct ConnectionQueue {
    /// Conexiones pendientes en orden de llegada
    pending: Mutex<VecDeque<TcpStream>>,

    /// Condvar para despertar workers cuando llega una conexión
    condvar: Condvar,
}

impl ConnectionQueue {
    /// Crea una cola vacía
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
        }
    }

    /// Encola una conexión y despierta a un worker
    pub fn push(&self, stream: TcpStream) {
        let mut pending = self.pending.lock().unwrap();
        pending.push_back(stream);
        self.condvar.notify_one();
    }

    /// Desencola la conexión más antigua.
    ///
    /// Bloquea hasta que haya una conexión disponible.
    pub fn pop(&self) -> TcpStream {
        let mut pending = self.pending.lock().unwrap();

        loop {
            if let Some(stream) = pending.pop_front() {
                return stream;
            }

            // Esperar a que el accept loop encole algo
            pending = self.condvar.wait(pending).unwrap();
        }
    }

    /// Intenta desencolar sin bloquear
    pub fn try_pop(&self) -> Option<TcpStream> {
        self.pending.lock().unwrap().pop_front()
    }

    /// Cantidad de conexiones esperando worker
    pub fn len(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Verifica si la cola está vacía
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ConnectionQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Pool fijo de workers atendiendo conexiones
pub struct WorkerPool {
    queue: Arc<ConnectionQueue>,

    /// Handles de los workers; viven lo que vive el proceso
    workers: Vec<thread::JoinHandle<()>>,
}

impl WorkerPool {
    /// Lanza `size` workers compartiendo el router y los archivos estáticos.
    ///
    /// Cada worker es un loop: desencolar conexión, atenderla, repetir. Los
    /// errores de E/S de una conexión se registran y no afectan al worker ni
    /// al resto de las conexiones. Un pánico atendiendo una conexión tampoco
    /// mata al worker: el pool mantiene su tamaño durante toda la vida del
    /// proceso.
    pub fn new(size: usize, router: Arc<Router>, statics: Arc<StaticFiles>) -> Self {
        let queue = Arc::new(ConnectionQueue::new());

        let workers = (0..size)
            .map(|id| {
                let queue = Arc::clone(&queue);
                let router = Arc::clone(&router);
                let statics = Arc::clone(&statics);

                thread::spawn(move || loop {
                    let stream = queue.pop();
                    let outcome = catch_unwind(AssertUnwindSafe(|| {
                        tcp::handle_connection(stream, &router, &statics)
                    }));

                    match outcome {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => {
                            eprintln!("[worker-{}] error de E/S en la conexión: {}", id, e)
                        }
                        Err(_) => {
                            eprintln!("[worker-{}] pánico atendiendo la conexión", id)
                        }
                    }
                })
            })
            .collect();

        Self { queue, workers }
    }

    /// Entrega una conexión aceptada al pool
    pub fn submit(&self, stream: TcpStream) {
        self.queue.push(stream);
    }

    /// Cantidad de workers del pool
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Conexiones encoladas a la espera de un worker
    pub fn backlog(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::send_without_content;
    use crate::http::Request;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::time::Duration;

    fn connected_pair() -> (TcpStream, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let client = TcpStream::connect(addr).unwrap();
        let (server_side, _) = listener.accept().unwrap();
        (client, server_side)
    }

    #[test]
    fn test_queue_fifo_order() {
        let queue = ConnectionQueue::new();
        let (_c1, s1) = connected_pair();
        let (_c2, s2) = connected_pair();

        let first_port = s1.peer_addr().unwrap().port();
        let second_port = s2.peer_addr().unwrap().port();

        queue.push(s1);
        queue.push(s2);

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop().peer_addr().unwrap().port(), first_port);
        assert_eq!(queue.pop().peer_addr().unwrap().port(), second_port);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_try_pop_empty() {
        let queue = ConnectionQueue::new();
        assert!(queue.try_pop().is_none());
    }

    #[test]
    fn test_pop_blocks_until_push() {
        let queue = Arc::new(ConnectionQueue::new());

        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.pop())
        };

        // Dar tiempo a que el consumidor quede esperando en la condvar
        thread::sleep(Duration::from_millis(50));
        let (_client, server_side) = connected_pair();
        queue.push(server_side);

        consumer.join().unwrap();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_pool_serves_submitted_connections() {
        let router = Arc::new(Router::new());
        router.add_route(
            "GET",
            "/ping",
            |_req: &Request, out: &mut dyn std::io::Write| send_without_content(out, "200 Pong"),
        );
        let statics = Arc::new(StaticFiles::with_defaults("./no_existe"));

        let pool = WorkerPool::new(2, router, statics);
        assert_eq!(pool.size(), 2);

        // Varias conexiones en paralelo para ejercitar ambos workers
        let mut clients = Vec::new();
        for _ in 0..4 {
            let (mut client, server_side) = connected_pair();
            client
                .write_all(b"GET /ping HTTP/1.1\r\nHost: x\r\n\r\n")
                .unwrap();
            pool.submit(server_side);
            clients.push(client);
        }

        for mut client in clients {
            client
                .set_read_timeout(Some(Duration::from_secs(5)))
                .unwrap();
            let mut response = String::new();
            client.read_to_string(&mut response).unwrap();
            assert!(response.starts_with("HTTP/1.1 200 Pong\r\n"), "{}", response);
        }

        // Todas las conexiones ya fueron respondidas: la cola quedó drenada
        assert_eq!(pool.backlog(), 0);
    }

    #[test]
    fn test_pool_survives_panicking_connection() {
        let router = Arc::new(Router::new());
        router.add_route(
            "GET",
            "/boom",
            |_req: &Request, _out: &mut dyn std::io::Write| panic!("handler explotó"),
        );
        router.add_route(
            "GET",
            "/ping",
            |_req: &Request, out: &mut dyn std::io::Write| send_without_content(out, "200 Pong"),
        );
        let statics = Arc::new(StaticFiles::with_defaults("./no_existe"));

        // Un solo worker: si el pánico lo matara, la segunda conexión no se
        // atendería nunca
        let pool = WorkerPool::new(1, router, statics);

        let (mut boom_client, boom_side) = connected_pair();
        boom_client
            .write_all(b"GET /boom HTTP/1.1\r\nHost: x\r\n\r\n")
            .unwrap();
        pool.submit(boom_side);

        let (mut ping_client, ping_side) = connected_pair();
        ping_client
            .write_all(b"GET /ping HTTP/1.1\r\nHost: x\r\n\r\n")
            .unwrap();
        pool.submit(ping_side);

        boom_client
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let mut first = String::new();
        boom_client.read_to_string(&mut first).unwrap();
        assert!(
            first.starts_with("HTTP/1.1 500 Internal Server Error\r\n"),
            "{}",
            first
        );

        ping_client
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let mut second = String::new();
        ping_client.read_to_string(&mut second).unwrap();
        assert!(second.starts_with("HTTP/1.1 200 Pong\r\n"), "{}", second);
    }
}
