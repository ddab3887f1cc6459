//! Loading calculation results from disk.

use anyhow::Context;
use flate2::read::GzDecoder;
use log::info;
use std::{io::Read, sync::Arc};
use swi_mesh::{calculation::CalculationResult, Dataset, SpacingConfig};

/// Decode a file body, gunzipping when the path ends in `.gz`.
pub fn decode_body(path: &str, bytes: Vec<u8>) -> anyhow::Result<String> {
    if path.ends_with(".gz") {
        let mut body = String::new();
        GzDecoder::new(&bytes[..])
            .read_to_string(&mut body)
            .with_context(|| format!("Failed to decompress {}", path))?;
        Ok(body)
    } else {
        String::from_utf8(bytes).with_context(|| format!("{} is not UTF-8", path))
    }
}

pub async fn load_calculation_result(path: &str) -> anyhow::Result<CalculationResult> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path))?;
    let body = decode_body(path, bytes)?;
    let result = CalculationResult::from_json(&body)
        .with_context(|| format!("Failed to parse calculation result {}", path))?;
    info!(
        "Loaded {}: status {}, {} prefectures, {} mesh entries",
        path,
        result.status,
        result.prefectures.len(),
        result.mesh_count()
    );
    Ok(result)
}

/// Load a calculation result and build the shared dataset snapshot.
pub async fn load_dataset(path: &str, config: &SpacingConfig) -> anyhow::Result<Arc<Dataset>> {
    let result = load_calculation_result(path).await?;
    let dataset = Dataset::from_calculation_result(result, config)
        .with_context(|| format!("Unusable calculation result in {}", path))?;
    Ok(Arc::new(dataset))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    pub(crate) const RESULT_JSON: &str = r#"{
  "status": "success",
  "calculation_time": "2023-07-01T01:12:45",
  "initial_time": "2023-06-30T15:00:00",
  "prefectures": {
    "osaka": {
      "name": "Osaka",
      "code": "osaka",
      "areas": [
        {
          "name": "North",
          "meshes": [
            {"code": "52350001", "lat": 34.70, "lon": 135.50,
             "advisary_bound": 10, "warning_bound": 20, "dosyakei_bound": 30,
             "swi_timeline": [{"ft": 0, "value": 5}, {"ft": 3, "value": 12}]},
            {"code": "52350002", "lat": 34.70, "lon": 135.51,
             "advisary_bound": 10, "warning_bound": 20, "dosyakei_bound": 30,
             "swi_timeline": [{"ft": 0, "value": 15}, {"ft": 3, "value": 22}]}
          ]
        },
        {
          "name": "South",
          "meshes": [
            {"code": "52350003", "lat": 34.71, "lon": 135.50,
             "advisary_bound": 10, "warning_bound": 20, "dosyakei_bound": 30,
             "swi_timeline": [{"ft": 0, "value": 25}, {"ft": 3, "value": 2}]},
            {"code": "52350004", "lat": 34.71, "lon": 135.51,
             "advisary_bound": 10, "warning_bound": 20, "dosyakei_bound": 30,
             "swi_timeline": [{"ft": 0, "value": 35}, {"ft": 3, "value": 31}]}
          ]
        }
      ]
    }
  }
}"#;

    pub(crate) fn result_dataset() -> Dataset {
        let result = CalculationResult::from_json(RESULT_JSON).unwrap();
        Dataset::from_calculation_result(result, &SpacingConfig::default()).unwrap()
    }

    #[test]
    fn test_decode_plain_body() {
        let body = decode_body("result.json", RESULT_JSON.as_bytes().to_vec()).unwrap();
        assert_eq!(body, RESULT_JSON);
        assert!(decode_body("result.json", vec![0xff, 0xfe]).is_err());
    }

    #[test]
    fn test_decode_gzip_body() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(RESULT_JSON.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();
        let body = decode_body("result.json.gz", compressed).unwrap();
        assert_eq!(body, RESULT_JSON);
    }

    #[tokio::test]
    async fn test_load_dataset() {
        let path = std::env::temp_dir().join(format!("swi-cmd-input-{}.json", std::process::id()));
        tokio::fs::write(&path, RESULT_JSON).await.unwrap();
        let path_str = path.to_string_lossy().to_string();
        let dataset = load_dataset(&path_str, &SpacingConfig::default()).await.unwrap();
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.areas().len(), 2);
        tokio::fs::remove_file(&path).await.unwrap();

        assert!(load_dataset("/nonexistent/result.json", &SpacingConfig::default())
            .await
            .is_err());
    }
}
