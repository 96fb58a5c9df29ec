// Copyright (c) 2026 rezky_nightky

use std::fs::File;
use std::path::Path;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use log::{debug, info};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use matrix_rain::canvas::TermCanvas;
use matrix_rain::config::{
    color_enabled_stdout, print_list_charsets, Args, Props, DENSITY_RANGE, DRY_RATE_RANGE,
    FADE_RATE_RANGE, MAX_RESOLUTION, SPACE_RANGE,
};
use matrix_rain::engine::MatrixRain;
use matrix_rain::frame::Frame;
use matrix_rain::scheduler::FrameQueue;
use matrix_rain::terminal::{
    color_mode_label, container_size, detect_color_mode, restore_terminal_best_effort, Terminal,
};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn require_f64_range(name: &str, v: f64, min: f64, max: f64) -> f64 {
    if !v.is_finite() {
        eprintln!("failed to apply {} {} (must be a finite number)", name, v);
        std::process::exit(1);
    }
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn require_u32_range(name: &str, v: u32, min: u32, max: u32) -> u32 {
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn check_flag_ranges(args: &Args) {
    let checks = [
        ("--density", args.density, DENSITY_RANGE),
        ("--delay", args.delay, (1.0, 10000.0)),
        ("--dry-rate", args.dry_rate, DRY_RATE_RANGE),
        ("--fade-rate", args.fade_rate, FADE_RATE_RANGE),
        ("--space-x", args.space_x, SPACE_RANGE),
        ("--space-y", args.space_y, SPACE_RANGE),
    ];
    for (name, v, (min, max)) in checks {
        if let Some(v) = v {
            require_f64_range(name, v, min, max);
        }
    }
    if let Some(x) = args.resolution_x {
        require_u32_range("--resolution-x", x, 1, MAX_RESOLUTION);
    }
    if let Some(y) = args.resolution_y {
        require_u32_range("--resolution-y", y, 1, MAX_RESOLUTION);
    }
}

/// Log records go to `log_file` when given; the screen belongs to the rain.
fn init_logging(log_file: Option<&Path>) -> std::io::Result<()> {
    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .format_timestamp_millis()
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        None => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off"))
                .init();
        }
    }
    Ok(())
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.about("Falling-characters rain for the terminal. Press q or Esc to quit.");
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);
    cmd.build();

    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }
    cmd.build();

    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.list_charsets {
        print_list_charsets();
        return Ok(());
    }

    if let Err(e) = init_logging(args.log_file.as_deref()) {
        eprintln!("failed to open log file: {}", e);
        std::process::exit(1);
    }

    let color_mode = detect_color_mode(args.colormode).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });

    let target_fps = require_f64_range("--fps", args.fps, 1.0, 240.0);
    let duration_s = args.duration.and_then(|s| {
        if !s.is_finite() {
            eprintln!("failed to apply --duration {} (must be a finite number)", s);
            std::process::exit(1);
        }
        (s > 0.0).then(|| require_f64_range("--duration", s, 0.1, 86400.0))
    });

    check_flag_ranges(&args);
    let flags = args.flag_props().unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });
    let props = args
        .props
        .as_deref()
        .map(Props::from_query_or_default)
        .unwrap_or_default()
        .merge(flags);

    let mut term = Terminal::new()?;
    let (w, h) = term.size()?;

    let mut config = props.clone().resolve((w as u32, h as u32));
    info!(
        "starting: terminal {}x{}, resolution {}x{}, {}, {} fps",
        w,
        h,
        config.resolution_x,
        config.resolution_y,
        color_mode_label(color_mode),
        target_fps
    );

    let start_time = Instant::now();
    let end_time = duration_s.map(|s| start_time + Duration::from_secs_f64(s));

    let mut canvas = TermCanvas::new(0, 0);
    let mut frame = Frame::new(w, h);
    let mut frames = FrameQueue::new();
    let mut rain = MatrixRain::mount(
        &config,
        &mut canvas,
        container_size(w, h),
        &mut frames,
        elapsed_ms(start_time),
    );

    let target_period = Duration::from_secs_f64(1.0 / target_fps);
    let mut next_frame = Instant::now();
    let mut running = true;

    while running {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            break;
        }
        let mut pending_resize: Option<(u16, u16)> = None;

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                match Terminal::read_event()? {
                    Event::Resize(nw, nh) => {
                        pending_resize = Some((nw, nh));
                    }
                    Event::Key(k) if k.kind == KeyEventKind::Press => match (k.code, k.modifiers) {
                        (KeyCode::Esc, _) | (KeyCode::Char('q'), _) => running = false,
                        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => {
                            running = false
                        }
                        _ => {}
                    },
                    _ => {}
                }
            }

            if !running || pending_resize.is_some() {
                break;
            }

            let now = Instant::now();
            if now >= next_frame {
                break;
            }

            let mut timeout = next_frame - now;
            if let Some(end) = end_time {
                if now >= end {
                    break;
                }
                timeout = timeout.min(end - now);
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if !running {
            break;
        }

        if let Some((nw, nh)) = pending_resize {
            frame = Frame::new(nw, nh);
            config = props.clone().resolve((nw as u32, nh as u32));
            rain.update_config(&config, &mut canvas);
            rain.container_resized(&canvas, container_size(nw, nh));
            info!(
                "terminal resized to {}x{}, resolution {}x{}",
                nw, nh, config.resolution_x, config.resolution_y
            );
        }

        let now_ms = elapsed_ms(start_time);
        for handle in frames.take_pending() {
            rain.on_animation_frame(handle, now_ms, &mut canvas, &mut frames);
        }

        canvas.present(&mut frame, color_mode);
        if frame.is_dirty() {
            term.draw(&mut frame)?;
        }

        next_frame += target_period;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }

    debug!("{} drops on screen at exit", rain.state().drops.len());
    rain.unmount(&mut frames);
    drop(term);
    info!("stopped after {:.1}s", start_time.elapsed().as_secs_f64());

    Ok(())
}
