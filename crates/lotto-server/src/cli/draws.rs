use crate::cli::{DrawArgs, LatestArgs, MissingArgs, RangeArgs, SearchArgs};
use anyhow::Result;
use lotto_client::LottoClient;
use lotto_core::{Draw, NumberHit};

pub async fn draw(args: DrawArgs, server: &str) -> Result<()> {
    let client = LottoClient::new(server);
    match client.draw(args.round).await? {
        Some(draw) => print_draws(&[draw], &args.format),
        None => {
            println!("Round {} is not available yet.", args.round);
            Ok(())
        }
    }
}

pub async fn bulk(args: RangeArgs, server: &str) -> Result<()> {
    let client = LottoClient::new(server);
    let draws = client.bulk(args.from, args.to).await?;
    print_draws(&draws, &args.format)
}

pub async fn latest(args: LatestArgs, server: &str) -> Result<()> {
    let client = LottoClient::new(server);
    let draws = client.latest(args.count).await?;
    print_draws(&draws, &args.format)
}

pub async fn missing(args: MissingArgs, server: &str) -> Result<()> {
    let client = LottoClient::new(server);
    let report = client.missing(args.from, args.to, args.weeks).await?;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Missing in the last {} draws:", report.weeks);
    println!("  {}", join_numbers(&report.missing));
    println!();
    println!("{:>6}  {:>6}", "NUMBER", "STREAK");
    println!("{}", "─".repeat(14));
    for s in &report.streaks {
        println!("{:>6}  {:>6}", s.number, s.streak);
    }
    if report.streaks.is_empty() {
        println!("(no long streaks)");
    }
    Ok(())
}

pub async fn search(args: SearchArgs, server: &str) -> Result<()> {
    let client = LottoClient::new(server);
    let hits = client.search(args.number, args.from, args.to).await?;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    println!("{:>6}  {:<10}  {:<20}  {}", "ROUND", "DATE", "NUMBERS", "NEXT");
    println!("{}", "─".repeat(64));
    for NumberHit { draw, next_draw } in &hits {
        let next = next_draw
            .as_ref()
            .map(|d| format!("{}: {}", d.round, join_numbers(&d.numbers)))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>6}  {:<10}  {:<20}  {}",
            draw.round,
            draw.date,
            join_numbers(&draw.numbers),
            next
        );
    }
    println!("\n{} of the draws contain {}", hits.len(), args.number);
    Ok(())
}

fn print_draws(draws: &[Draw], format: &str) -> Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(draws)?);
        return Ok(());
    }

    println!("{:>6}  {:<10}  {:<20}  {}", "ROUND", "DATE", "NUMBERS", "BONUS");
    println!("{}", "─".repeat(48));
    for d in draws {
        println!(
            "{:>6}  {:<10}  {:<20}  {}",
            d.round,
            d.date,
            join_numbers(&d.numbers),
            d.bonus
        );
    }
    Ok(())
}

fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:>2}", n))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_numbers_pads() {
        assert_eq!(join_numbers(&[2, 5, 15, 18, 19, 23]), " 2  5 15 18 19 23");
        assert_eq!(join_numbers(&[]), "");
    }
}
