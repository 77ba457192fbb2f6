//
// cargo run page.pbm -m iw2 -r high -o page.prn
//
use std::{fs, io::Write, process};

use imagewriter::{Config, Matrix, MatrixSource, Model, Printer, Resolution};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: imagewriter <page.pbm> [-m dmp|iw|iw2|iwlq] [-r low|med|high|lq] [-c] [-o output]");
        process::exit(2);
    }

    let mut input: Option<String> = None;
    let mut output: Option<String> = None;
    let mut model = Model::ImageWriterII;
    let mut resolution = Resolution::High;
    let mut color = false;

    let mut iter = args[1..].iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-m" => {
                model = match iter.next().map(String::as_str) {
                    Some("dmp") => Model::AppleDmp,
                    Some("iw") => Model::ImageWriter,
                    Some("iw2") => Model::ImageWriterII,
                    Some("iwlq") => Model::ImageWriterLq,
                    other => die(&format!("unknown model {:?}", other)),
                }
            }
            "-r" => {
                resolution = match iter.next().map(String::as_str) {
                    Some("low") => Resolution::Low,
                    Some("med") => Resolution::Med,
                    Some("high") => Resolution::High,
                    Some("lq") => Resolution::Lq,
                    other => die(&format!("unknown resolution {:?}", other)),
                }
            }
            "-c" => color = true,
            "-o" => output = iter.next().cloned(),
            _ => input = Some(arg.clone()),
        }
    }

    let input = input.unwrap_or_else(|| die("no input file given"));
    let bytes = match fs::read(&input) {
        Ok(bytes) => bytes,
        Err(err) => die(&format!("can not read {}: {}", input, err)),
    };
    let rows = match read_pbm(&bytes) {
        Ok(rows) => rows,
        Err(msg) => die(&format!("{}: {}", input, msg)),
    };
    let mut source = match MatrixSource::new(rows) {
        Ok(source) => source,
        Err(err) => die(&format!("{}: {}", input, err)),
    };

    let mut config = Config::new(model, resolution);
    if color {
        config = config.color();
    }

    let result = match output {
        Some(path) => {
            let file = match fs::File::create(&path) {
                Ok(file) => file,
                Err(err) => die(&format!("can not create {}: {}", path, err)),
            };
            print_to(config, file, &mut source)
        }
        None => {
            let stdout = std::io::stdout();
            print_to(config, stdout.lock(), &mut source)
        }
    };

    if let Err(err) = result {
        die(&format!("print failed: {}", err));
    }
}

fn print_to<W: Write>(
    config: Config,
    sink: W,
    source: &mut MatrixSource,
) -> Result<(), imagewriter::Error> {
    let mut printer = Printer::new(config, sink)?;
    printer.print_page(source)
}

fn die(msg: &str) -> ! {
    eprintln!("imagewriter: {}", msg);
    process::exit(1);
}

/// Parse a binary PBM (P4) file into packed rows.
fn read_pbm(bytes: &[u8]) -> Result<Matrix, String> {
    let mut pos = 0;

    let mut token = |bytes: &[u8]| -> Result<Vec<u8>, String> {
        // Skip whitespace and '#' comments between header fields.
        loop {
            match bytes.get(pos) {
                Some(b) if b.is_ascii_whitespace() => pos += 1,
                Some(b'#') => {
                    while let Some(&b) = bytes.get(pos) {
                        pos += 1;
                        if b == b'\n' {
                            break;
                        }
                    }
                }
                Some(_) => break,
                None => return Err("truncated header".to_string()),
            }
        }
        let start = pos;
        while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        Ok(bytes[start..pos].to_vec())
    };

    if token(bytes)? != b"P4" {
        return Err("not a binary PBM (P4) file".to_string());
    }
    let width: usize = String::from_utf8_lossy(&token(bytes)?)
        .parse()
        .map_err(|_| "bad width".to_string())?;
    let height: usize = String::from_utf8_lossy(&token(bytes)?)
        .parse()
        .map_err(|_| "bad height".to_string())?;

    // Single whitespace byte after the header, then packed raster data.
    pos += 1;
    let line_size = (width + 7) / 8;
    if bytes.len() < pos + line_size * height {
        return Err("truncated raster data".to_string());
    }

    let mut rows = Matrix::with_capacity(height);
    for y in 0..height {
        let start = pos + y * line_size;
        rows.push(bytes[start..start + line_size].to_vec());
    }
    Ok(rows)
}
