use pcbkit_camtools::{interpret_drill, interpret_gerber, DEFAULT_DRILL_DIAMETER_MM};
use pcbkit_core::{normalize_text, ApertureShape, Point};

const KICAD_TOP_COPPER: &str = "%TF.GenerationSoftware,KiCad,Pcbnew,8.0.4*%\r
%TF.FileFunction,Copper,L1,Top*%\r
%FSLAX46Y46*%\r
G04 Gerber Fmt 4.6, Leading zero omitted, Abs format (unit mm)*\r
%MOMM*%\r
%LPD*%\r
G01*\r
G04 APERTURE LIST*\r
%ADD10C,0.250000*%\r
%ADD11R,1.700000X1.700000*%\r
%ADD12O,1.700000X1.000000*%\r
%ADD13RoundRect,0.250000X-0.450000X0.350000X0.450000X0.350000X0*%\r
G04 APERTURE END LIST*\r
D10*\r
X100000000Y-50000000D02*\r
X110000000Y-50000000D01*\r
X110000000Y-40000000D01*\r
D11*\r
X100000000Y-50000000D03*\r
D12*\r
X110000000Y-40000000D03*\r
D13*\r
X105000000Y-45000000D03*\r
G36*\r
X90000000Y-60000000D02*\r
G01*\r
X95000000Y-60000000D01*\r
X95000000Y-55000000D01*\r
X90000000Y-55000000D01*\r
X90000000Y-60000000D01*\r
G37*\r
M02*\r
";

#[test]
fn test_kicad_layer() {
    let text = normalize_text(KICAD_TOP_COPPER);
    let prims = interpret_gerber("board-F_Cu.gbr", &text);

    assert_eq!(prims.tracks.len(), 2);
    assert_eq!(prims.tracks[0].start, Point::new(100.0, -50.0));
    assert_eq!(prims.tracks[1].end, Point::new(110.0, -40.0));
    assert!(prims.tracks.iter().all(|t| t.width == 0.25));

    assert_eq!(prims.flashes.len(), 3);
    assert_eq!(
        prims.flashes[0].aperture,
        Some(ApertureShape::Rectangle {
            width: 1.7,
            height: 1.7
        })
    );
    assert!(matches!(
        prims.flashes[1].aperture,
        Some(ApertureShape::Obround { .. })
    ));
    assert!(matches!(
        &prims.flashes[2].aperture,
        Some(ApertureShape::Other { template, size: Some(_) }) if template == "RoundRect"
    ));

    assert_eq!(prims.regions.len(), 1);
    assert_eq!(prims.regions[0].boundary.len(), 4);
}

#[test]
fn test_kicad_drill_file() {
    let text = normalize_text(
        "M48\n; DRILL file {KiCad 8.0.4} date 2024-08-01\n; FORMAT={-:-/ absolute / metric / decimal}\n\
         ; #@! TF.FileFunction,Plated,1,2,PTH\nFMAT,2\nMETRIC\nT1C0.400\nT2C1.000\n%\nG90\nG05\n\
         T1\nX120.65Y-85.09\nX125.73Y-85.09\nT2\nX130.0Y-80.0\nT0\nM30\n",
    );
    let holes = interpret_drill("board-PTH.drl", &text);
    assert_eq!(holes.len(), 3);
    assert_eq!(holes[0].diameter, 0.4);
    assert_eq!(holes[0].position, Point::new(120.65, -85.09));
    assert_eq!(holes[2].diameter, 1.0);
    assert!(holes.iter().all(|h| h.plated));
}

#[test]
fn test_drill_decoding_is_literal() {
    let holes = interpret_drill("board.drl", "T01C0.300\nT01\nX012345Y067890");
    assert_eq!(holes.len(), 1);
    assert_eq!(holes[0].position, Point::new(12345.0, 67890.0));
    assert_eq!(holes[0].diameter, 0.300);
    assert!(holes[0].plated);
}

#[test]
fn test_parse_is_independent_per_file() {
    let a = interpret_gerber("a.gbr", "%MOIN*%%ADD10C,0.1*%D10*X0Y0D02*X10000Y0D01*");
    let b = interpret_gerber("b.gbr", "X0Y0D02*X10000Y0D01*");
    assert_eq!(a.tracks.len(), 1);
    // No aperture carried over from the first file.
    assert!(b.tracks.is_empty());
}

#[test]
fn test_percent_in_comment_keeps_framing() {
    let prims = interpret_gerber(
        "board-F_Cu.gbr",
        "%FSLAX26Y26*%\n%MOMM*%\nG04 copper pour 100% fill*\n%ADD10C,0.2*%\nD10*\nX0Y0D02*\nX1000000Y0D01*\nM02*",
    );
    assert_eq!(prims.tracks.len(), 1);
    assert_eq!(prims.tracks[0].width, 0.2);
    assert_eq!(prims.tracks[0].end, Point::new(1.0, 0.0));
}

#[test]
fn test_drill_header_tools_need_selection() {
    let holes = interpret_drill("board.drl", "M48\nMETRIC\nT1C0.3\nT2C1.5\n%\nX1.0Y1.0\nM30");
    assert_eq!(holes.len(), 1);
    assert_eq!(holes[0].diameter, DEFAULT_DRILL_DIAMETER_MM);
}
