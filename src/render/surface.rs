/// Picks the framebuffer config with the most MSAA samples. On a tie the
/// earlier config wins, so the display's own ordering is respected.
pub fn pick_most_samples<C>(
    configs: impl Iterator<Item = C>,
    samples: impl Fn(&C) -> u8,
) -> Option<C> {
    configs.reduce(|accum, config| {
        if samples(&config) > samples(&accum) {
            config
        } else {
            accum
        }
    })
}
