use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ovp8xx_pcic::{
    ClientConfig, ErrorMessage, Frame, MessageHandler, NotificationMessage, PcicClient,
};

use crate::cmd::StreamArgs;
use crate::exit::{protocol_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_error, print_frame, print_notification, OutputFormat};

/// Prints every dispatched message and counts them.
struct Receiver {
    format: OutputFormat,
    messages: u64,
}

impl MessageHandler for Receiver {
    fn result(&mut self, frame: Frame) {
        print_frame(&frame, self.messages, self.format);
        self.messages += 1;
    }

    fn error(&mut self, message: ErrorMessage) {
        print_error(&message, self.format);
        self.messages += 1;
    }

    fn notification(&mut self, message: NotificationMessage) {
        print_notification(&message, self.format);
        self.messages += 1;
    }
}

pub fn run(args: StreamArgs, format: OutputFormat) -> CliResult<i32> {
    let config = ClientConfig {
        host: args.ip,
        port: args.port,
        read_timeout: None,
    };
    let mut client =
        PcicClient::connect(&config).map_err(|err| protocol_error("connect failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut receiver = Receiver {
        format,
        messages: 0,
    };

    while running.load(Ordering::SeqCst) {
        match client.process_incoming(&mut receiver) {
            Ok(()) => {}
            Err(err) if err.is_connection_closed() => return Ok(SUCCESS),
            Err(err) => return Err(protocol_error("receive failed", err)),
        }

        if let Some(count) = args.count {
            if receiver.messages >= count {
                return Ok(SUCCESS);
            }
        }
    }

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
