//! ASCV CLI - Pack, inspect and unpack ASCII-art video containers.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use ascv::{
    Compression, Frame, VideoConfig,
    container::{self, ContainerReader},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    let result = match args.get(1).map(String::as_str) {
        Some("--example") => {
            print_example_config();
            Ok(())
        }
        Some("info") if args.len() == 3 => info(Path::new(&args[2])),
        Some("pack") if args.len() >= 4 => pack(
            Path::new(&args[2]),
            Path::new(&args[3]),
            &args[4..].iter().map(PathBuf::from).collect::<Vec<_>>(),
        ),
        Some("unpack") if args.len() == 4 => unpack(Path::new(&args[2]), Path::new(&args[3])),
        _ => {
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [args]", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  info <file.ascv>                              Show header and frame sizes");
    eprintln!("  pack <config.json> <out.ascv> <frame.txt>...  Build a container from text frames");
    eprintln!("  unpack <file.ascv> <out_dir>                  Write each frame as a text file");
    eprintln!("  --example                                     Print an example configuration");
}

fn info(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = fs::File::open(path)?;
    let mut reader = ContainerReader::new(std::io::BufReader::new(file))?;
    let header = *reader.header();
    let frames = reader.read_to_end()?;

    println!("{}", path.display());
    println!("  Version:     {}", header.version);
    println!("  Size:        {}x{}", header.width, header.height);
    println!("  FPS:         {}", header.fps);
    println!("  Compression: {}", compression_name(header.compression));
    println!("  Charset:     {}", header.charset);
    println!("  Frames:      {} declared, {} stored", header.frames, frames.len());

    if !frames.is_empty() {
        let sizes: Vec<usize> = frames.iter().map(Frame::size).collect();
        let total: usize = sizes.iter().sum();
        let min = sizes.iter().min().copied().unwrap_or(0);
        let max = sizes.iter().max().copied().unwrap_or(0);
        println!(
            "  Frame bytes: {} total, {} min, {} max, {} avg",
            total,
            min,
            max,
            total / frames.len()
        );
        if header.fps > 0 {
            println!(
                "  Duration:    {:.2}s",
                frames.len() as f32 / f32::from(header.fps)
            );
        }
    }

    Ok(())
}

fn compression_name(flag: u8) -> String {
    match Compression::from_u8(flag) {
        Some(Compression::None) => "none".to_string(),
        Some(Compression::Rle) => "rle".to_string(),
        None => format!("unknown ({})", flag),
    }
}

fn pack(
    config_path: &Path,
    out_path: &Path,
    frame_paths: &[PathBuf],
) -> Result<(), Box<dyn std::error::Error>> {
    let config: VideoConfig = serde_json::from_str(&fs::read_to_string(config_path)?)?;
    config.validate()?;

    let frames = frame_paths
        .iter()
        .map(|p| fs::read(p).map(|raw| Frame::encode(&raw, config.compression)))
        .collect::<Result<Vec<_>, _>>()?;

    let header = config.header(u32::try_from(frames.len())?);
    let stats = container::write_file(out_path, &header, &frames)?;

    println!("Wrote {}: {}", out_path.display(), stats);
    Ok(())
}

fn unpack(path: &Path, out_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (header, frames) = container::read_file(path)?;
    let compression = header
        .compression()
        .ok_or_else(|| format!("unsupported compression flag {}", header.compression))?;

    fs::create_dir_all(out_dir)?;
    for (i, frame) in frames.iter().enumerate() {
        let target = out_dir.join(format!("frame_{:05}.txt", i));
        fs::write(&target, frame.decode(compression)?)?;
    }

    println!("Unpacked {} frames into {}", frames.len(), out_dir.display());
    Ok(())
}

fn print_example_config() {
    let config = VideoConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
