use std::io::{self, Read};
use std::pin::Pin;
use std::task::{Context, Poll};

use iohub::{
    Color, ColorChoice, ConsoleColor, HubConfig, HubError, IoHub, OutputType,
    PrintUnit, Tier, palette,
};
use tokio::io::{AsyncReadExt, AsyncWrite};

fn config(choice: ColorChoice) -> HubConfig {
    HubConfig::new().configure(|c| {
        c.set_color_choice(choice);
    })
}

/// Accepts `budget` writes, then fails every one after.
struct Failing {
    budget: usize,
    written: Vec<u8>,
}

impl io::Write for Failing {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.budget == 0 {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
        }
        self.budget -= 1;
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Async sink that accepts `budget` writes, then fails every one after.
struct FailingAsync {
    budget: usize,
    written: Vec<u8>,
}

impl AsyncWrite for FailingAsync {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if self.budget == 0 {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "sink closed",
            )));
        }
        self.budget -= 1;
        self.written.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Input that always fails.
struct BrokenInput;

impl Read for BrokenInput {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "tty gone"))
    }
}

#[test]
fn plain_tier_ignores_colors() {
    let mut hub =
        IoHub::new(config(ColorChoice::Never), io::empty(), Vec::<u8>::new(), Vec::new());
    assert_eq!(hub.tier(), Tier::Plain);
    hub.write(&PrintUnit::new("hello").fg(Color::RED)).unwrap();
    assert_eq!(hub.into_parts().1, b"hello");
}

#[test]
fn ansi_tier_examples() {
    let mut hub = IoHub::new(
        config(ColorChoice::AlwaysAnsi),
        io::empty(),
        Vec::<u8>::new(),
        Vec::new(),
    );
    hub.write(&PrintUnit::new("hi").fg(Color::RED)).unwrap();
    hub.write(&PrintUnit::new("x")).unwrap();
    hub.write(&PrintUnit::new("x").fg(Color::GREEN).bg(Color::BLUE)).unwrap();
    let out = String::from_utf8(hub.into_parts().1).unwrap();
    assert_eq!(out, "\x1b[91mhi\x1b[0mx\x1b[92m\x1b[104mx\x1b[0m");
}

#[test]
fn off_palette_colors_are_folded() {
    let mut hub = IoHub::new(
        config(ColorChoice::Always),
        io::empty(),
        Vec::<u8>::new(),
        Vec::new(),
    );
    // (0, 114, 0) is equally close to DarkGreen and Green.
    hub.write(&PrintUnit::new("t").fg(Color::new(0, 114, 0))).unwrap();
    assert_eq!(hub.into_parts().1, b"\x1b[32mt\x1b[0m");
}

#[test]
fn failed_write_stops_the_unit() {
    let sink = || Failing { budget: 1, written: Vec::new() };
    let mut hub =
        IoHub::new(config(ColorChoice::Always), io::empty(), sink(), sink());
    let err = hub.write(&PrintUnit::new("text").fg(Color::RED)).unwrap_err();
    match err {
        HubError::StreamWrite(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("unexpected error: {other}"),
    }
    let (_, out, _) = hub.into_parts();
    assert_eq!(out.written, b"\x1b[91m");
}

#[test]
fn palette_codes_match_table() {
    let expected: [(ConsoleColor, u8); 16] = [
        (ConsoleColor::Black, 30),
        (ConsoleColor::DarkBlue, 34),
        (ConsoleColor::DarkGreen, 32),
        (ConsoleColor::DarkCyan, 36),
        (ConsoleColor::DarkRed, 31),
        (ConsoleColor::DarkMagenta, 35),
        (ConsoleColor::DarkYellow, 33),
        (ConsoleColor::Gray, 90),
        (ConsoleColor::DarkGray, 37),
        (ConsoleColor::Blue, 94),
        (ConsoleColor::Green, 92),
        (ConsoleColor::Cyan, 96),
        (ConsoleColor::Red, 91),
        (ConsoleColor::Magenta, 95),
        (ConsoleColor::Yellow, 93),
        (ConsoleColor::White, 97),
    ];
    for (cc, fg) in expected {
        assert_eq!(palette::foreground_code(cc.rgb()), fg, "{cc}");
        assert_eq!(palette::background_code(cc.rgb()), fg + 10, "{cc}");
    }
}

#[tokio::test]
async fn async_writes_reach_a_pipe_in_order() {
    let (mut rx, tx) = tokio::io::duplex(64);
    let (_, err_tx) = tokio::io::duplex(64);
    let mut hub = IoHub::new(config(ColorChoice::Always), tokio::io::empty(), tx, err_tx);

    hub.write_async(&PrintUnit::new("x").fg(Color::GREEN).bg(Color::BLUE))
        .await
        .unwrap();
    hub.write_line_async("warn", OutputType::Warning).await.unwrap();
    drop(hub);

    let mut got = String::new();
    rx.read_to_string(&mut got).await.unwrap();
    assert_eq!(got, "\x1b[92m\x1b[104mx\x1b[0m\x1b[33mwarn\x1b[0m\n");
}

#[tokio::test]
async fn failed_async_write_stops_the_unit() {
    let sink = || FailingAsync { budget: 2, written: Vec::new() };
    let mut hub =
        IoHub::new(config(ColorChoice::Always), tokio::io::empty(), sink(), sink());
    let unit = PrintUnit::new("text").fg(Color::RED).bg(Color::new(0, 0, 197));
    match hub.write_async(&unit).await.unwrap_err() {
        HubError::StreamWrite(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("unexpected error: {other}"),
    }
    let (_, out, _) = hub.into_parts();
    assert_eq!(out.written, b"\x1b[91m\x1b[44m");
}

#[test]
fn failed_read_is_reported() {
    let input = io::BufReader::new(BrokenInput);
    let mut hub = IoHub::new(HubConfig::new(), input, Vec::<u8>::new(), Vec::new());
    match hub.read_line().unwrap_err() {
        HubError::StreamRead(e) => {
            assert_eq!(e.kind(), io::ErrorKind::ConnectionReset)
        }
        other => panic!("unexpected error: {other}"),
    }
}
