// Serial Port Log Sink (COM1)
//
// Minimal output-only driver for the legacy 16550 UART at 0x3F8, used as
// the log backend during bring-up. It needs no heap and no interrupts, so it
// works from the very first instruction of `_cstart`.
//
// Line settings: 38400 baud (divisor 3), 8N1, FIFO enabled. The transmit
// holding register is polled before each byte and `\n` goes out as `\r\n`.
//
// Only built for bare-metal x86_64; port I/O goes through the `x86_64`
// crate's `Port`.

use core::fmt;

use spin::Mutex;
use x86_64::instructions::port::Port;

use crate::log::LogSink;
use crate::util::without_interrupts;

const COM1: u16 = 0x3F8;

pub struct SerialPort {
    base: u16,
}

impl SerialPort {
    pub const fn new(base: u16) -> Self {
        SerialPort { base }
    }

    /// Program the UART. Leaves it untouched if the loopback self-test fails.
    pub fn init(&mut self) {
        unsafe {
            self.outb(1, 0x00);
            self.outb(3, 0x80);
            self.outb(0, 0x03);
            self.outb(1, 0x00);
            self.outb(3, 0x03);
            self.outb(2, 0xC7);
            self.outb(4, 0x0B);
            self.outb(4, 0x1E);
            self.outb(0, 0xAE);

            if self.inb(0) != 0xAE {
                return;
            }

            self.outb(4, 0x0F);
        }
    }

    fn is_transmit_empty(&mut self) -> bool {
        unsafe { self.inb(5) & 0x20 != 0 }
    }

    pub fn write_byte(&mut self, byte: u8) {
        while !self.is_transmit_empty() {
            core::hint::spin_loop();
        }

        unsafe { self.outb(0, byte) };
    }

    unsafe fn outb(&mut self, offset: u16, value: u8) {
        Port::<u8>::new(self.base + offset).write(value);
    }

    unsafe fn inb(&mut self, offset: u16) -> u8 {
        Port::<u8>::new(self.base + offset).read()
    }
}

impl fmt::Write for SerialPort {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.write_byte(b'\r');
            }
            self.write_byte(byte);
        }
        Ok(())
    }
}

pub static SERIAL1: Mutex<SerialPort> = Mutex::new(SerialPort::new(COM1));

/// `LogSink` that writes to `SERIAL1`.
pub struct SerialSink;

pub static SERIAL_SINK: SerialSink = SerialSink;

impl LogSink for SerialSink {
    fn write_entry(&self, args: fmt::Arguments) {
        use core::fmt::Write;

        without_interrupts(|| {
            let _ = SERIAL1.lock().write_fmt(args);
        });
    }
}

pub fn init() {
    SERIAL1.lock().init();
}
