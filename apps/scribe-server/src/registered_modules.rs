//! Feature modules compiled into the server, in registration order.

use modkit::FeatureModule;

#[must_use]
#[cfg_attr(not(feature = "subscriptions"), allow(unused_mut))]
pub fn all() -> Vec<Box<dyn FeatureModule>> {
    let mut modules: Vec<Box<dyn FeatureModule>> = vec![
        Box::new(auth::AuthModule),
        Box::new(dashboard::DashboardModule),
        Box::new(templates::TemplatesModule),
        Box::new(recording::RecordingModule),
    ];

    #[cfg(feature = "subscriptions")]
    modules.push(Box::new(subscriptions::SubscriptionsModule::default()));

    modules
}
