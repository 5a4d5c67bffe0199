//! Write a clipboard-like HTML fragment with a production table, for trying
//! the pipeline by hand: `generate_sample [output.html]`.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use sector_periods::format::format_number;
use sector_periods::{extract, PeriodConfig};

/// Gaussian production bump around `peak`.
fn bump(hour: f64, (peak, width, height): (f64, f64, f64)) -> f64 {
    let z = (hour - peak) / width;
    height * (-0.5 * z * z).exp()
}

/// Reproducible noise in `[0, 1)` (SplitMix64).
struct Noise(u64);

impl Noise {
    fn sample(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// (sector, [(peak hour, width, m² at peak)])
const SECTORS: &[(&str, &[(f64, f64, f64)])] = &[
    ("Corte", &[(9.0, 2.0, 180.0), (14.5, 1.5, 150.0)]),
    ("Dobra", &[(10.0, 2.5, 120.0), (19.0, 2.0, 60.0)]),
    ("Solda", &[(8.5, 1.5, 90.0), (15.0, 2.0, 110.0), (23.0, 1.5, 40.0)]),
    ("Pintura", &[(13.5, 3.0, 140.0)]),
    ("Expedição", &[(11.0, 3.5, 75.0), (18.0, 1.5, 55.0)]),
];

fn main() -> Result<()> {
    env_logger::init();

    let output: PathBuf = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_paste.html".to_string())
        .into();

    let mut noise = Noise(42);
    let mut html = String::new();

    html.push_str("<html><body><!--StartFragment-->\n");
    // Layout table pasted along with the report.
    html.push_str("<table><tr><td>Painel</td><td>Produção</td><td>Sair</td></tr></table>\n");

    html.push_str("<table border=1>\n<tr><th>Setor</th>");
    for hour in 0..24 {
        write!(html, "<th>{hour}h</th>")?;
    }
    html.push_str("<th>Total</th></tr>\n");

    let mut column_totals = [0.0f64; 24];
    for &(name, peaks) in SECTORS {
        let mut row_total = 0.0;
        write!(html, "<tr><td>{name}</td>")?;
        for (hour, column_total) in column_totals.iter_mut().enumerate() {
            let signal: f64 = peaks.iter().map(|&p| bump(hour as f64, p)).sum();
            let value = signal * (0.9 + 0.2 * noise.sample());
            row_total += value;
            *column_total += value;
            write!(html, "<td>{}</td>", format_number(value))?;
        }
        writeln!(html, "<td>{}</td></tr>", format_number(row_total))?;
    }

    html.push_str("<tr><td>Total</td>");
    for value in column_totals {
        write!(html, "<td>{}</td>", format_number(value))?;
    }
    writeln!(html, "<td>{}</td></tr>", format_number(column_totals.iter().sum()))?;

    // A ragged line, as left behind by merged cells.
    html.push_str("<tr><td>Observações</td><td>-</td></tr>\n");
    html.push_str("</table><!--EndFragment--></body></html>\n");

    let extraction = extract(&html, &PeriodConfig::current()).context("sample does not round-trip")?;
    log::info!("Sample parses into {} sectors", extraction.analysis.len());

    std::fs::write(&output, html).with_context(|| format!("writing {}", output.display()))?;
    println!("Wrote {} sectors to {}", SECTORS.len(), output.display());
    Ok(())
}
