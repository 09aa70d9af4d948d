use serde::{Deserialize, Serialize};

/// Cinema as the rest of the client sees it, after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cinema {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub postcode: String,
    pub phone: String,
    pub email: String,
    pub country: String,
    pub state_or_province: Option<String>,
    pub total_screens: u32,
}

/// Raw cinema record as returned by the API.
///
/// Older records carry `address`, newer ones `addressLine`; this DTO
/// accepts both and [`CinemaDto::normalize`] is the single place where
/// that drift is reconciled. Do not use this type outside the client
/// edge.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CinemaDto {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub state_or_province: Option<String>,
    pub total_screens: Option<u32>,
}

impl CinemaDto {
    pub fn normalize(self) -> Cinema {
        Cinema {
            id: self.id,
            name: self.name,
            // `address` wins when both fields are present
            address: self
                .address
                .or(self.address_line)
                .unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            postcode: self.postcode.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
            state_or_province: self.state_or_province,
            total_screens: self.total_screens.unwrap_or_default(),
        }
    }
}

/// Full-entity body for `POST /api/cinemas` and `PUT /api/cinemas/{id}`.
/// The API does not support partial updates, so every field is sent
/// every time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CinemaPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address_line: String,
    pub city: String,
    pub postcode: String,
    pub country: String,
    pub state_or_province: Option<String>,
    pub total_screens: u32,
}

impl CinemaPayload {
    /// Local state to show after the server acknowledged this payload
    /// with an empty 204 body.
    pub fn into_cinema(self, id: i64) -> Cinema {
        Cinema {
            id,
            name: self.name,
            address: self.address_line,
            city: self.city,
            postcode: self.postcode,
            phone: self.phone,
            email: self.email,
            country: self.country,
            state_or_province: self.state_or_province,
            total_screens: self.total_screens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_prefers_address_over_address_line() {
        let dto = CinemaDto {
            id: 1,
            name: "Odeon".into(),
            address: Some("1 High Street".into()),
            address_line: Some("ignored".into()),
            city: None,
            postcode: None,
            phone: None,
            email: None,
            country: Some("UK".into()),
            state_or_province: None,
            total_screens: Some(5),
        };
        let cinema = dto.normalize();
        assert_eq!(cinema.address, "1 High Street");
        assert_eq!(cinema.city, "");
        assert_eq!(cinema.total_screens, 5);
    }

    #[test]
    fn normalize_falls_back_to_address_line() {
        let dto = CinemaDto {
            id: 2,
            name: "Vue".into(),
            address: None,
            address_line: Some("9 Market Square".into()),
            city: Some("London".into()),
            postcode: None,
            phone: None,
            email: None,
            country: None,
            state_or_province: None,
            total_screens: None,
        };
        assert_eq!(dto.normalize().address, "9 Market Square");
    }
}
