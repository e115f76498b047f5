mod commands;
mod decompose;
mod obj;
mod shapes;
mod tessellate;

use clap::{App, Arg, ArgMatches, SubCommand};
use commands::{CliError, DecomposeCmd, TessellateCmd};

use thicklines::tessellation::{MarkerOptions, StrokeOptions};

use std::fs::File;
use std::io::{self, stdout, Read};

fn main() {
    env_logger::init();

    let matches = app().get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn app() -> App<'static, 'static> {
    App::new("Thicklines command-line interface")
        .version("0.1")
        .about("Decomposes mesh wireframes into curves and tessellates them as thick lines")
        .subcommand(
            SubCommand::with_name("decompose")
                .about("Prints the curves covering the edges of a mesh, one per line")
                .arg(
                    Arg::with_name("COUNT")
                        .short("c")
                        .long("count")
                        .help("Prints the number of edges, curves and segments"),
                ),
        )
        .subcommand(
            SubCommand::with_name("tessellate")
                .about("Tessellates the wireframe of a mesh")
                .arg(
                    Arg::with_name("THICKNESS")
                        .short("t")
                        .long("thickness")
                        .help("Half width of the lines in pixels (3 by default)")
                        .value_name("THICKNESS")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("MITER_LIMIT")
                        .short("l")
                        .long("miter-limit")
                        .help("Miter limit between -1 (never miter) and 1 (always miter), 0.75 by default")
                        .value_name("LIMIT")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("VIEWPORT")
                        .long("viewport")
                        .help("Viewport size in pixels, for example 1024x768")
                        .value_name("WxH")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("PERSPECTIVE")
                        .short("p")
                        .long("perspective")
                        .help("Scales the thickness by SCALE / w")
                        .value_name("SCALE")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("MARKERS")
                        .short("m")
                        .long("markers")
                        .help("Also tessellates a marker per point"),
                )
                .arg(
                    Arg::with_name("RADIUS")
                        .short("r")
                        .long("radius")
                        .help("Marker radius in pixels (4 by default)")
                        .value_name("RADIUS")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("COUNT")
                        .short("c")
                        .long("count")
                        .help("Prints the number of triangles and vertices"),
                ),
        )
        .arg(
            Arg::with_name("INPUT")
                .help("Sets the Wavefront OBJ file to use")
                .short("i")
                .long("input")
                .value_name("FILE")
                .takes_value(true)
                .required(false),
        )
        .arg(
            Arg::with_name("SHAPE")
                .help("Uses a built-in mesh instead of a file")
                .short("s")
                .long("shape")
                .value_name("SHAPE")
                .possible_values(shapes::SHAPES)
                .takes_value(true)
                .required(false),
        )
        .arg(
            Arg::with_name("MERGE")
                .help("Merges vertices that share a position")
                .long("merge"),
        )
        .arg(
            Arg::with_name("OUTPUT")
                .help("Sets the output file to use")
                .value_name("FILE")
                .short("o")
                .long("output")
                .takes_value(true)
                .required(false),
        )
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    let mut mesh = if let Some(input_file) = matches.value_of("INPUT") {
        let mut src = String::new();
        File::open(input_file)?.read_to_string(&mut src)?;
        obj::parse_obj(&src)?
    } else {
        shapes::shape(matches.value_of("SHAPE").unwrap_or("cube"))?
    };

    if matches.is_present("MERGE") {
        let removed = mesh.merge_duplicate_vertices();
        log::info!("merged {} vertices", removed);
    }

    let output: Box<dyn io::Write> = match matches.value_of("OUTPUT") {
        Some(output_file) => Box::new(File::create(output_file)?),
        None => Box::new(stdout()),
    };

    if let Some(decompose_matches) = matches.subcommand_matches("decompose") {
        decompose::decompose(DecomposeCmd {
            mesh,
            output,
            count: decompose_matches.is_present("COUNT"),
        })
    } else if let Some(tess_matches) = matches.subcommand_matches("tessellate") {
        let cmd = TessellateCmd {
            mesh,
            output,
            stroke: get_stroke_options(tess_matches)?,
            markers: if tess_matches.is_present("MARKERS") {
                Some(get_marker_options(tess_matches)?)
            } else {
                None
            },
            count: tess_matches.is_present("COUNT"),
        };

        tessellate::tessellate(cmd)
    } else {
        eprintln!("{}", matches.usage());
        Ok(())
    }
}

fn get_stroke_options(matches: &ArgMatches) -> Result<StrokeOptions, CliError> {
    let mut options = StrokeOptions::default();

    if let Some(thickness) = parse_arg::<f32>(matches, "THICKNESS")? {
        options = options.with_thickness(thickness);
    }
    if let Some(limit) = parse_arg::<f32>(matches, "MITER_LIMIT")? {
        if !(-1.0..=1.0).contains(&limit) {
            return Err(CliError::InvalidArg {
                arg: "MITER_LIMIT",
                value: limit.to_string(),
            });
        }
        options = options.with_miter_limit(limit);
    }
    if let Some((w, h)) = get_viewport(matches)? {
        options = options.with_viewport(w, h);
    }
    if let Some(scale) = parse_arg::<f32>(matches, "PERSPECTIVE")? {
        options = options.with_perspective_scale(Some(scale));
    }

    Ok(options)
}

fn get_marker_options(matches: &ArgMatches) -> Result<MarkerOptions, CliError> {
    let mut options = MarkerOptions::default();

    if let Some(radius) = parse_arg::<f32>(matches, "RADIUS")? {
        options = options.with_radius(radius);
    }
    if let Some((w, h)) = get_viewport(matches)? {
        options = options.with_viewport(w, h);
    }

    Ok(options)
}

fn get_viewport(matches: &ArgMatches) -> Result<Option<(f32, f32)>, CliError> {
    let value = match matches.value_of("VIEWPORT") {
        Some(value) => value,
        None => return Ok(None),
    };

    let invalid = || CliError::InvalidArg {
        arg: "VIEWPORT",
        value: value.to_string(),
    };

    let mut parts = value.split('x');
    let w: f32 = parts.next().and_then(|w| w.parse().ok()).ok_or_else(invalid)?;
    let h: f32 = parts.next().and_then(|h| h.parse().ok()).ok_or_else(invalid)?;
    if parts.next().is_some() {
        return Err(invalid());
    }

    Ok(Some((w, h)))
}

fn parse_arg<T: std::str::FromStr>(
    matches: &ArgMatches,
    name: &'static str,
) -> Result<Option<T>, CliError> {
    match matches.value_of(name) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| CliError::InvalidArg {
                arg: name,
                value: value.to_string(),
            }),
        None => Ok(None),
    }
}

#[cfg(test)]
fn tessellate_options(args: &[&str]) -> Result<StrokeOptions, CliError> {
    let mut argv = vec!["thicklines", "tessellate"];
    argv.extend_from_slice(args);
    let matches = app().get_matches_from(argv);
    get_stroke_options(matches.subcommand_matches("tessellate").unwrap())
}

#[test]
fn viewport_argument() {
    let options = tessellate_options(&["--viewport", "800x600"]).unwrap();
    assert_eq!((options.viewport.width, options.viewport.height), (800.0, 600.0));

    let defaults = tessellate_options(&[]).unwrap();
    assert_eq!(defaults.viewport, StrokeOptions::default().viewport);

    for value in &["800", "800x", "800x600x2", "wide"] {
        match tessellate_options(&["--viewport", value]) {
            Err(CliError::InvalidArg { arg: "VIEWPORT", .. }) => {}
            other => panic!("{:?} accepted: {:?}", value, other.map(|o| o.viewport)),
        }
    }
}

#[test]
fn stroke_arguments() {
    let options = tessellate_options(&["-t", "1.5", "--miter-limit=-1", "-p", "500"]).unwrap();
    assert_eq!(options.thickness, 1.5);
    assert_eq!(options.miter_limit, -1.0);
    assert_eq!(options.perspective_scale, Some(500.0));

    match tessellate_options(&["--miter-limit", "2"]) {
        Err(CliError::InvalidArg { arg: "MITER_LIMIT", value }) => assert_eq!(value, "2"),
        other => panic!("miter limit 2 accepted: {:?}", other.map(|o| o.miter_limit)),
    }
    assert!(matches!(
        tessellate_options(&["-t", "thick"]),
        Err(CliError::InvalidArg { arg: "THICKNESS", .. })
    ));
}
