use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub duration_minutes: Option<u32>,
    pub price: Option<u32>,
}

const SERVICES: &[ServiceInfo] = &[
    service("Saç Kesimi", 30, 450),
    service("Sakal Tıraşı", 20, 300),
    service("Saç-Sakal Kesimi", 45, 600),
    service("Çocuk Tıraşı", 30, 300),
    service("Saç Boyama", 60, 1500),
    service("Saç Şekillendirme", 30, 400),
    service("Saç Bakımı", 45, 800),
    service("Saç Yıkama+Fön", 30, 350),
    service("Saç Düzleştirme", 60, 1000),
    service("Keratin Düzleştirme", 60, 2000),
    service("Saçta Renklendirme", 75, 2000),
    service("Cilt Bakımı", 30, 1500),
    service("Ağda(Tüm Vücut)", 60, 1200),
    service("Yanak Kulak Ağda", 15, 150),
    service("Kaş Alma", 15, 200),
    service("Manikür", 30, 400),
    service("Pedikür", 45, 500),
    ServiceInfo {
        name: "Tüm Hizmetler",
        duration_minutes: None,
        price: None,
    },
];

const fn service(name: &'static str, duration_minutes: u32, price: u32) -> ServiceInfo {
    ServiceInfo {
        name,
        duration_minutes: Some(duration_minutes),
        price: Some(price),
    }
}

pub fn all() -> &'static [ServiceInfo] {
    SERVICES
}

pub fn lookup(name: &str) -> Option<&'static ServiceInfo> {
    SERVICES.iter().find(|info| info.name == name)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub duration_minutes: u32,
    pub price: u32,
}

/// Unknown services and services without a fixed price add nothing.
pub fn totals<S: AsRef<str>>(services: &[S]) -> Totals {
    services
        .iter()
        .filter_map(|name| lookup(name.as_ref()))
        .fold(Totals::default(), |acc, info| Totals {
            duration_minutes: acc.duration_minutes + info.duration_minutes.unwrap_or(0),
            price: acc.price + info.price.unwrap_or(0),
        })
}
