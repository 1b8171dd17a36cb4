//! Raw serial line to the actuator
//!
//! A tty node is switched to raw 8N1 at 1 Mbaud when opened. Output
//! processing is off, so protocol bytes such as 0x0A reach the device
//! untouched. Each flush waits until the kernel has sent everything.
//! Anything that is not a tty (a FIFO or a capture file) is written as is.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Actuator line speed, in baud
pub const BAUD_RATE: u32 = 1_000_000;

#[cfg(target_os = "linux")]
const LINE_SPEED: libc::speed_t = libc::B1000000;
#[cfg(all(unix, not(target_os = "linux")))]
const LINE_SPEED: libc::speed_t = BAUD_RATE as libc::speed_t;

#[derive(Debug)]
pub struct SerialLine {
    file: File,
    is_tty: bool,
}

impl SerialLine {
    /// Open `path` for writing and put it in raw mode if it is a tty
    pub fn open(path: &Path) -> io::Result<Self> {
        let mut options = OpenOptions::new();
        options.read(true).write(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.custom_flags(libc::O_NOCTTY);
        }
        let file = options.open(path)?;
        let is_tty = configure_raw(&file)?;
        if !is_tty {
            log::debug!("{} is not a tty, line settings untouched", path.display());
        }
        Ok(Self { file, is_tty })
    }

    pub fn is_tty(&self) -> bool {
        self.is_tty
    }
}

impl Write for SerialLine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.is_tty {
            drain(&self.file)?;
        }
        Ok(())
    }
}

/// Returns whether `file` is a tty; only ttys are reconfigured
#[cfg(unix)]
fn configure_raw(file: &File) -> io::Result<bool> {
    use std::os::unix::io::AsRawFd;

    let fd = file.as_raw_fd();
    if unsafe { libc::isatty(fd) } == 0 {
        return Ok(false);
    }

    unsafe {
        let mut termios: libc::termios = std::mem::zeroed();
        if libc::tcgetattr(fd, &mut termios) != 0 {
            return Err(io::Error::last_os_error());
        }

        // Raw 8N1: no input/output processing, no echo, no signals
        libc::cfmakeraw(&mut termios);
        termios.c_cflag |= libc::CLOCAL | libc::CREAD;
        termios.c_cflag &= !(libc::CSTOPB | libc::CRTSCTS);
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 1;

        if libc::cfsetspeed(&mut termios, LINE_SPEED) != 0 {
            return Err(io::Error::last_os_error());
        }
        if libc::tcsetattr(fd, libc::TCSANOW, &termios) != 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(true)
}

#[cfg(not(unix))]
fn configure_raw(_file: &File) -> io::Result<bool> {
    Ok(false)
}

#[cfg(unix)]
fn drain(file: &File) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;

    if unsafe { libc::tcdrain(file.as_raw_fd()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(unix))]
fn drain(_file: &File) -> io::Result<()> {
    Ok(())
}
