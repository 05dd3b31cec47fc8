use crate::logger;
use crossbeam_channel::{Receiver, Sender};
use rodio::{Decoder, OutputStream, Sink};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::thread;

/// Fire-and-forget pronunciation playback.
pub trait Pronouncer {
    /// Plays `path`, stopping whatever is currently playing.
    fn play(&self, path: &Path);
    fn stop(&self);
}

/// Used when no audio device could be opened.
#[derive(Debug, Default)]
pub struct SilentPronouncer;

impl Pronouncer for SilentPronouncer {
    fn play(&self, path: &Path) {
        logger::log(&format!("Audio disabled, not playing {}", path.display()));
    }

    fn stop(&self) {}
}

#[derive(Debug)]
enum AudioRequest {
    Play(PathBuf),
    Stop,
}

/// Plays audio on a dedicated thread that owns the output stream.
pub struct AudioWorker {
    tx: Sender<AudioRequest>,
    _handle: thread::JoinHandle<()>,
}

impl AudioWorker {
    pub fn spawn() -> io::Result<Self> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let handle = thread::Builder::new()
            .name("spelling-drill::audio".to_string())
            .spawn(move || run_worker(rx))?;
        Ok(Self {
            tx,
            _handle: handle,
        })
    }
}

impl Pronouncer for AudioWorker {
    fn play(&self, path: &Path) {
        self.tx.send(AudioRequest::Play(path.to_path_buf())).ok();
    }

    fn stop(&self) {
        self.tx.send(AudioRequest::Stop).ok();
    }
}

fn run_worker(rx: Receiver<AudioRequest>) {
    // The stream must outlive the sink, so both stay on this thread.
    let output = match OutputStream::try_default() {
        Ok(output) => Some(output),
        Err(e) => {
            logger::log(&format!("No audio output device: {}", e));
            None
        }
    };
    let sink = output.as_ref().and_then(|(_, handle)| match Sink::try_new(handle) {
        Ok(sink) => Some(sink),
        Err(e) => {
            logger::log(&format!("Failed to create audio sink: {}", e));
            None
        }
    });

    for request in rx {
        let Some(sink) = &sink else {
            continue;
        };
        match request {
            AudioRequest::Play(path) => play_file(sink, &path),
            AudioRequest::Stop => sink.stop(),
        }
    }
    logger::log("Audio channel disconnected, exiting");
}

fn play_file(sink: &Sink, path: &Path) {
    sink.stop();

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            logger::log(&format!("Audio file {} not available: {}", path.display(), e));
            return;
        }
    };
    let source = match Decoder::new(BufReader::new(file)) {
        Ok(source) => source,
        Err(e) => {
            logger::log(&format!("Failed to decode {}: {}", path.display(), e));
            return;
        }
    };

    logger::log(&format!("Playing {}", path.display()));
    sink.append(source);
    sink.play();
}
