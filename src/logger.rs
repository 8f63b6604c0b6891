use std::{
    fs,
    io::{self, Write},
    process,
    sync::mpsc,
    thread,
};

pub use data::log::Error;

const MAX_LOG_FILE_SIZE: u64 = 50 * 1024 * 1024; // 50 MB

const OWN_CRATES: [&str; 3] = ["data", "exchange", "kandleboard"];

enum LogMessage {
    Content(Vec<u8>),
    Flush,
    Shutdown,
}

/// `RUST_LOG` as a single level, `Debug` when unset.
fn level_filter() -> Result<log::LevelFilter, Error> {
    let level = std::env::var("RUST_LOG")
        .ok()
        .as_deref()
        .map(str::parse::<log::Level>)
        .transpose()?
        .unwrap_or(log::Level::Debug);

    Ok(level.to_level_filter())
}

pub fn setup(is_debug: bool) -> Result<(), Error> {
    let level_filter = level_filter()?;

    let mut io_sink = fern::Dispatch::new().format(|out, message, record| {
        out.finish(format_args!(
            "{}:{} -- {}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            record.level(),
            message
        ));
    });

    if is_debug {
        io_sink = io_sink.chain(std::io::stdout());
    } else {
        let file = data::log::file()?;
        let writer: Box<dyn Write + Send> = Box::new(BackgroundWriter::spawn(file)?);

        io_sink = io_sink.chain(writer);
    }

    let dispatch = OWN_CRATES.iter().fold(
        fern::Dispatch::new()
            .level(log::LevelFilter::Off)
            .level_for("panic", log::LevelFilter::Error),
        |dispatch, krate| dispatch.level_for(*krate, level_filter),
    );

    dispatch.chain(io_sink).apply()?;

    Ok(())
}

/// Hands formatted records to a dedicated thread that owns the log file.
struct BackgroundWriter {
    sender: mpsc::Sender<LogMessage>,
    _thread_handle: thread::JoinHandle<()>,
}

impl BackgroundWriter {
    fn spawn(file: fs::File) -> io::Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let mut sink = CappedFile::new(file)?;

        let thread_handle = thread::Builder::new()
            .name("log-writer".to_string())
            .spawn(move || {
                while let Ok(message) = receiver.recv() {
                    let result = match message {
                        LogMessage::Content(data) => sink.write_all(&data),
                        LogMessage::Flush => sink.flush(),
                        LogMessage::Shutdown => break,
                    };

                    if let Err(e) = result {
                        eprintln!("Logging error: {e}");
                    }
                }
            })?;

        Ok(Self {
            sender,
            _thread_handle: thread_handle,
        })
    }

    fn send(&self, message: LogMessage) -> io::Result<()> {
        self.sender
            .send(message)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "Log writer disconnected"))
    }
}

impl Write for BackgroundWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.send(LogMessage::Content(buf.to_vec()))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.send(LogMessage::Flush)
    }
}

impl Drop for BackgroundWriter {
    fn drop(&mut self) {
        let _ = self.send(LogMessage::Shutdown);
    }
}

/// Log file that aborts the process instead of growing past the cap.
struct CappedFile {
    file: fs::File,
    written: u64,
}

impl CappedFile {
    fn new(file: fs::File) -> io::Result<Self> {
        let written = file.metadata()?.len();

        Ok(Self { file, written })
    }
}

impl Write for CappedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written + buf.len() as u64 > MAX_LOG_FILE_SIZE {
            let error_msg = format!(
                "\n{}:FATAL -- Log file size would exceed the maximum allowed size of {} bytes\n",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                MAX_LOG_FILE_SIZE
            );

            eprintln!("{error_msg}");

            let _ = self.file.write_all(error_msg.as_bytes());
            let _ = self.file.flush();

            process::abort();
        }

        let bytes = self.file.write(buf)?;
        self.written += bytes as u64;

        Ok(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
