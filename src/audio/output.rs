//! Audio device integration using rodio
//!
//! The rodio `OutputStream` is not `Send`, so a dedicated thread owns it and
//! every live sink; callers talk to the thread over a command channel. The
//! thread keeps at most one looping background sink plus the set of still
//! playing one-shot sinks, and applies the volume scalar to all of them so a
//! volume change lands instantly and uniformly.

use anyhow::{anyhow, Result};
use crossbeam_channel::{bounded, unbounded, Sender};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, Sink, Source};
use std::thread;

use super::{AudioOutput, DecodedSound};

enum Command {
    PlayLoop(DecodedSound),
    PlayOneshot(DecodedSound),
    SetVolume(f32),
    StopLoop,
    StopAll,
    Shutdown,
}

/// `AudioOutput` backed by the system audio device.
pub struct RodioOutput {
    tx: Sender<Command>,
}

impl RodioOutput {
    /// Open the default output device. Fails when no audio backend is
    /// available (headless hosts); callers may fall back to a silent output.
    pub fn new() -> Result<Self> {
        let (tx, rx) = unbounded::<Command>();
        let (init_tx, init_rx) = bounded::<std::result::Result<(), String>>(1);

        let spawned = thread::Builder::new()
            .name("audio-output".to_string())
            .spawn(move || {
                // The stream must live on this thread for as long as anything
                // plays; dropping it silences every sink.
                let (_stream, handle) = match OutputStream::try_default() {
                    Ok(pair) => {
                        let _ = init_tx.send(Ok(()));
                        pair
                    }
                    Err(e) => {
                        let _ = init_tx.send(Err(e.to_string()));
                        return;
                    }
                };

                let mut volume: f32 = 1.0;
                let mut background: Option<Sink> = None;
                let mut oneshots: Vec<Sink> = Vec::new();

                while let Ok(command) = rx.recv() {
                    oneshots.retain(|sink| !sink.empty());
                    match command {
                        Command::PlayLoop(sound) => {
                            if let Some(old) = background.take() {
                                old.stop();
                            }
                            match Sink::try_new(&handle) {
                                Ok(sink) => {
                                    sink.set_volume(volume);
                                    sink.append(buffer_for(&sound).repeat_infinite());
                                    background = Some(sink);
                                }
                                Err(e) => log::warn!("failed to open background sink: {}", e),
                            }
                        }
                        Command::PlayOneshot(sound) => match Sink::try_new(&handle) {
                            Ok(sink) => {
                                sink.set_volume(volume);
                                sink.append(buffer_for(&sound));
                                oneshots.push(sink);
                            }
                            Err(e) => log::warn!("failed to open one-shot sink: {}", e),
                        },
                        Command::SetVolume(v) => {
                            volume = v;
                            if let Some(sink) = &background {
                                sink.set_volume(volume);
                            }
                            for sink in &oneshots {
                                sink.set_volume(volume);
                            }
                        }
                        Command::StopLoop => {
                            if let Some(sink) = background.take() {
                                sink.stop();
                            }
                        }
                        Command::StopAll => {
                            if let Some(sink) = background.take() {
                                sink.stop();
                            }
                            for sink in oneshots.drain(..) {
                                sink.stop();
                            }
                        }
                        Command::Shutdown => break,
                    }
                }
                log::debug!("audio output thread exiting");
            });

        spawned.map_err(|e| anyhow!("failed to spawn audio thread: {}", e))?;
        init_rx
            .recv()
            .map_err(|_| anyhow!("audio thread died during startup"))?
            .map_err(|e| anyhow!("failed to open audio output: {}", e))?;

        Ok(Self { tx })
    }

    fn send(&self, command: Command) {
        // A closed channel means the output thread is gone; playback requests
        // degrade to no-ops, matching the absent-asset behavior.
        let _ = self.tx.send(command);
    }
}

fn buffer_for(sound: &DecodedSound) -> SamplesBuffer<f32> {
    SamplesBuffer::new(sound.channels, sound.sample_rate, (*sound.samples).clone())
}

impl AudioOutput for RodioOutput {
    fn play_loop(&self, sound: DecodedSound) {
        self.send(Command::PlayLoop(sound));
    }

    fn play_oneshot(&self, sound: DecodedSound) {
        self.send(Command::PlayOneshot(sound));
    }

    fn set_volume(&self, volume: f32) {
        self.send(Command::SetVolume(volume));
    }

    fn stop_loop(&self) {
        self.send(Command::StopLoop);
    }

    fn stop_all(&self) {
        self.send(Command::StopAll);
    }
}

impl Drop for RodioOutput {
    fn drop(&mut self) {
        let _ = self.tx.send(Command::Shutdown);
    }
}

/// Output that swallows every request. Used when no audio backend exists;
/// the app still runs, just silently.
pub struct SilentOutput;

impl AudioOutput for SilentOutput {
    fn play_loop(&self, _sound: DecodedSound) {}
    fn play_oneshot(&self, _sound: DecodedSound) {}
    fn set_volume(&self, _volume: f32) {}
    fn stop_loop(&self) {}
    fn stop_all(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn try_output() -> Option<RodioOutput> {
        match RodioOutput::new() {
            Ok(output) => Some(output),
            Err(e) => {
                eprintln!("Skipping rodio output test (audio backend unavailable): {e:#}");
                None
            }
        }
    }

    fn short_silence() -> DecodedSound {
        DecodedSound {
            channels: 1,
            sample_rate: 44100,
            samples: Arc::new(vec![0.0; 441]),
        }
    }

    #[test]
    fn smoke_loop_volume_stop() {
        let Some(output) = try_output() else {
            return;
        };
        output.play_loop(short_silence());
        output.set_volume(0.0);
        output.play_oneshot(short_silence());
        output.stop_loop();
        output.stop_all();
        thread::sleep(Duration::from_millis(50));
    }

    #[test]
    fn requests_after_drop_do_not_panic() {
        let Some(output) = try_output() else {
            return;
        };
        let tx = output.tx.clone();
        drop(output);
        thread::sleep(Duration::from_millis(20));
        let _ = tx.send(Command::StopAll);
    }
}
