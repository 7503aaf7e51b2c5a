use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use ovp8xx_pcic::{Chunk, DataFormat, ErrorMessage, Frame, NotificationMessage};
use serde::Serialize;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ChunkSummary {
    chunk_type: u32,
    size: usize,
    width: u32,
    height: u32,
    format: &'static str,
    frame_count: u32,
    status: u32,
}

impl ChunkSummary {
    fn from_chunk(chunk: &Chunk) -> Self {
        Self {
            chunk_type: chunk.chunk_type().0,
            size: chunk.size(),
            width: chunk.width(),
            height: chunk.height(),
            format: format_name(chunk.format()),
            frame_count: chunk.frame_count(),
            status: chunk.status(),
        }
    }
}

#[derive(Serialize)]
struct FrameSummary {
    message: u64,
    chunks: Vec<ChunkSummary>,
}

pub fn print_frame(frame: &Frame, message: u64, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = FrameSummary {
                message,
                chunks: frame.chunks.iter().map(ChunkSummary::from_chunk).collect(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    "MESSAGE", "TYPE", "SIZE", "WIDTH", "HEIGHT", "FORMAT", "COUNT", "STATUS",
                ]);
            for chunk in &frame.chunks {
                table.add_row(vec![
                    message.to_string(),
                    chunk.chunk_type().to_string(),
                    chunk.size().to_string(),
                    chunk.width().to_string(),
                    chunk.height().to_string(),
                    format_name(chunk.format()).to_string(),
                    chunk.frame_count().to_string(),
                    chunk.status().to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("message={} chunks={}", message, frame.len());
            for chunk in &frame.chunks {
                println!(
                    "  type={} size={} dim={}x{} format={} count={} status={}",
                    chunk.chunk_type(),
                    chunk.size(),
                    chunk.width(),
                    chunk.height(),
                    format_name(chunk.format()),
                    chunk.frame_count(),
                    chunk.status()
                );
            }
        }
        OutputFormat::Raw => {
            for chunk in &frame.chunks {
                print_raw(chunk.data());
            }
        }
    }
}

pub fn print_error(message: &ErrorMessage, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({ "error": { "id": message.id, "message": message.message } })
            );
        }
        _ => println!("error: id={} message={}", message.id, message.message),
    }
}

pub fn print_notification(message: &NotificationMessage, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "notification": { "id": message.id, "message": message.message }
                })
            );
        }
        _ => println!(
            "notification: id={} message={}",
            message.id, message.message
        ),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn format_name(format: DataFormat) -> &'static str {
    match format {
        DataFormat::U8 => "8U",
        DataFormat::S8 => "8S",
        DataFormat::U16 => "16U",
        DataFormat::S16 => "16S",
        DataFormat::U32 => "32U",
        DataFormat::S32 => "32S",
        DataFormat::F32 => "32F",
        DataFormat::U64 => "64U",
        DataFormat::F64 => "64F",
    }
}
