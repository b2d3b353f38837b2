use impact_providers::{
    ElevationClient, GenerativeClient, NeoFeedClient, ProviderConfig, SeismicClient, SeismicQuery,
    WeatherClient,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Keys come from GEMINI_API_KEY_1..4, OPENWEATHER_KEY_1..4, NASA_API_KEY, ...
    let config = ProviderConfig::from_env()?;
    println!("{:?}", config);
    println!(
        "usable keys: generative = {}, weather = {}",
        config.generative_ring().usable_count(),
        config.weather_ring().usable_count()
    );
    println!();

    let (lat, lon) = (21.3069, -157.8583);

    match WeatherClient::new(&config)?.current(lat, lon) {
        Ok(w) => println!(
            "Weather in {}: {}, {} °C",
            w.name,
            w.description,
            w.temp_c.map_or_else(|| "n/a".to_string(), |t| format!("{t:.1}"))
        ),
        Err(e) => println!("Weather unavailable: {e}"),
    }

    let elevation = ElevationClient::new(&config)?;
    println!(
        "Elevation ({} tiers): {:.1} m",
        elevation.tiers().len(),
        elevation.elevation_or_sea_level(lat, lon)
    );

    match SeismicClient::new(&config)?.history(&SeismicQuery::around(lat, lon)) {
        Ok(events) => println!(
            "Earthquakes within 300 km: {}",
            events["features"].as_array().map_or(0, Vec::len)
        ),
        Err(e) => println!("Seismic history unavailable: {e}"),
    }

    let feed_client = NeoFeedClient::new(&config)?;
    match feed_client.feed_today() {
        Ok(feed) => {
            println!(
                "NEO feed {}..{} ({}): {} objects",
                feed.start,
                feed.end,
                feed.source,
                feed.objects.len()
            );
            for neo in feed.objects.iter().filter(|n| n.is_hazardous).take(5) {
                println!("  hazardous: {} at {} km/s", neo.name, neo.velocity_km_s);
            }
        }
        Err(e) => println!("NEO feed unavailable: {e}"),
    }
    println!("cache hit ratio: {:.2}", feed_client.store().hit_ratio());

    let prompt = "Summarize a 100 m asteroid ocean impact in one sentence.";
    match GenerativeClient::new(&config)?.generate(prompt) {
        Ok(text) => println!("Summary: {text}"),
        Err(e) => println!("Generative summary unavailable: {e}"),
    }

    Ok(())
}
