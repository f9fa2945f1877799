use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded};
use tracing::{debug, trace};

use crate::color_pipeline::common::error::{ConversionError, Result};
use crate::color_pipeline::pixel::{PixelRgb, PixelYCbCr};
use crate::color_pipeline::quantized::StagedPipeline;

/// Producer side of the input queue. Dropping it closes the stream.
pub struct StreamWriter {
    input: Sender<PixelRgb>,
}

impl StreamWriter {
    /// Submits one pixel, blocking while the input queue is full.
    pub fn write(&self, pixel: PixelRgb) -> Result<()> {
        self.input
            .send(pixel)
            .map_err(|_| ConversionError::QueueDisconnected)
    }
}

/// Consumer side of the output queue.
pub struct StreamReader {
    output: Receiver<PixelYCbCr>,
}

impl StreamReader {
    /// Retrieves the next result, blocking while the output queue is empty.
    ///
    /// Fails once the worker has exited and every result has been read.
    pub fn read(&self) -> Result<PixelYCbCr> {
        self.output
            .recv()
            .map_err(|_| ConversionError::QueueDisconnected)
    }

    /// Results in submission order until the stream is closed and drained.
    pub fn iter(&self) -> impl Iterator<Item = PixelYCbCr> + '_ {
        self.output.iter()
    }
}

/// Handle on the thread clocking the pipeline.
pub struct StreamWorker {
    handle: JoinHandle<u64>,
}

impl StreamWorker {
    /// Waits for the worker to exit and returns how many ticks it ran.
    pub fn join(self) -> Result<u64> {
        self.handle
            .join()
            .map_err(|_| ConversionError::QueueDisconnected)
    }
}

/// Staged pipeline deployed behind two blocking FIFO queues.
pub struct StreamConverter {
    writer: StreamWriter,
    reader: StreamReader,
    worker: StreamWorker,
}

impl StreamConverter {
    /// Spawns the worker with input and output queues of `depth` slots each.
    pub fn spawn(pipeline: StagedPipeline, depth: usize) -> Result<Self> {
        if depth == 0 {
            return Err(ConversionError::InvalidQueueDepth(depth));
        }

        let (input_tx, input_rx) = bounded(depth);
        let (output_tx, output_rx) = bounded(depth);

        let handle = thread::Builder::new()
            .name("ycbcr-stream".to_string())
            .spawn(move || run_worker(pipeline, input_rx, output_tx))?;

        debug!(depth, "Stream converter started");

        Ok(Self {
            writer: StreamWriter { input: input_tx },
            reader: StreamReader { output: output_rx },
            worker: StreamWorker { handle },
        })
    }

    pub fn write(&self, pixel: PixelRgb) -> Result<()> {
        self.writer.write(pixel)
    }

    pub fn read(&self) -> Result<PixelYCbCr> {
        self.reader.read()
    }

    /// Separates the queue ends so producer and consumer can live on different threads.
    pub fn into_parts(self) -> (StreamWriter, StreamReader, StreamWorker) {
        (self.writer, self.reader, self.worker)
    }

    /// Closes the input queue, collects every remaining result and joins the worker.
    pub fn finish(self) -> Result<Vec<PixelYCbCr>> {
        let (writer, reader, worker) = self.into_parts();
        drop(writer);
        let remaining: Vec<PixelYCbCr> = reader.iter().collect();
        worker.join()?;
        Ok(remaining)
    }
}

fn run_worker(
    mut pipeline: StagedPipeline,
    input: Receiver<PixelRgb>,
    output: Sender<PixelYCbCr>,
) -> u64 {
    let mut open = true;

    loop {
        let next = if !open {
            None
        } else if pipeline.is_empty() {
            // nothing in flight: wait for the producer
            match input.recv() {
                Ok(pixel) => Some(pixel),
                Err(_) => {
                    open = false;
                    None
                }
            }
        } else {
            // keep in-flight pixels moving with bubbles
            match input.try_recv() {
                Ok(pixel) => Some(pixel),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => {
                    open = false;
                    None
                }
            }
        };

        if next.is_none() && !open && pipeline.is_empty() {
            break;
        }

        if let Some(result) = pipeline.tick(next) {
            trace!(%result, "Retiring pixel");
            if output.send(result).is_err() {
                debug!("Output queue closed by consumer");
                break;
            }
        }
    }

    debug!(ticks = pipeline.ticks(), "Stream converter stopped");
    pipeline.ticks()
}
